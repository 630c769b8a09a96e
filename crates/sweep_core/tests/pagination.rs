use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use sweep_core::{
    bounded_title, finalize_pages, keycap_number, meta_keys, render_pages, source_listing_title,
    text_len, CheckResult, DisplayOrder, FinalLabel, JobStatus, MetaValue, PageLayout, Provenance,
    RenderInput, PAUSED_BANNER,
};

fn init_logging() {
    sweep_logging::initialize_for_tests();
}

fn success(n: usize, risk: Option<f64>, provenance: Provenance) -> CheckResult {
    let mut metadata = BTreeMap::new();
    metadata.insert(meta_keys::COUNTRY.to_string(), MetaValue::from("DE"));
    metadata.insert(meta_keys::AS.to_string(), MetaValue::from("AS3320"));
    if let Some(risk) = risk {
        metadata.insert(meta_keys::RISK_SCORE.to_string(), MetaValue::from(risk));
    }
    CheckResult::new(format!("10.0.{}.{}", n / 250, n % 250 + 1), metadata, provenance)
}

fn input<'a>(successes: &'a [CheckResult], status: JobStatus, sources: usize) -> RenderInput<'a> {
    RenderInput {
        title: "Proxy IP Results",
        successes,
        checked: 100,
        total: 100,
        status,
        source_count: sources,
    }
}

fn addresses_in(pages: &[String]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.lines())
        .filter(|line| line.starts_with("10.0."))
        .filter_map(|line| line.split_whitespace().next())
        .map(ToOwned::to_owned)
        .collect()
}

#[test]
fn fifty_results_with_forty_five_per_page_make_two_pages() {
    init_logging();
    let successes: Vec<_> = (0..50).map(|n| success(n, None, Provenance::None)).collect();
    let pages = render_pages(&input(&successes, JobStatus::Running, 1), &PageLayout::default());

    assert_eq!(pages.len(), 2);
    assert!(pages[0].starts_with("**Proxy IP Results**\nChecked: 100/100 | Successful: 50\n---"));
    assert!(pages[1].starts_with("**Continuation Proxy IP Results**\nChecked: 100/100 | Successful: 50\n---"));
    assert_eq!(pages[0].matches("```").count(), 45 * 2);
    assert_eq!(pages[1].matches("```").count(), 5 * 2);
    assert!(pages[1].contains(&format!("```{}\n", keycap_number(46))));
}

#[test]
fn character_capacity_splits_pages_within_hard_limit() {
    init_logging();
    let layout = PageLayout::new(600, 100, 45, DisplayOrder::Arrival).unwrap();
    let successes: Vec<_> = (0..60).map(|n| success(n, None, Provenance::None)).collect();

    let running = render_pages(&input(&successes, JobStatus::Running, 1), &layout);
    assert!(running.len() > 2);
    for page in &running {
        assert!(text_len(page) <= layout.capacity(), "page too long: {}", text_len(page));
    }
    assert_eq!(addresses_in(&running).len(), 60);

    let paused = render_pages(&input(&successes, JobStatus::Paused, 1), &layout);
    assert!(paused[0].ends_with(PAUSED_BANNER));
    assert!(paused[1..].iter().all(|page| !page.contains(PAUSED_BANNER)));

    let finished = finalize_pages(
        render_pages(&input(&successes, JobStatus::Stopped, 1), &layout),
        "Proxy IP Results",
        true,
        FinalLabel::Cancelled,
    );
    for page in paused.iter().chain(finished.iter()) {
        assert!(text_len(page) <= layout.hard_limit());
    }
}

#[test]
fn multiple_sources_use_provenance_markers() {
    init_logging();
    let successes = vec![
        success(1, None, Provenance::Domain(1)),
        success(2, None, Provenance::Domain(1)),
        success(3, None, Provenance::Domain(0)),
    ];
    let layout = PageLayout::new(4096, 100, 45, DisplayOrder::Arrival).unwrap();

    let tagged = render_pages(&input(&successes, JobStatus::Running, 2), &layout);
    let two = format!("```{}\n", keycap_number(2));
    let one = format!("```{}\n", keycap_number(1));
    assert_eq!(tagged[0].matches(&two).count(), 2);
    assert_eq!(tagged[0].matches(&one).count(), 1);

    let counted = render_pages(&input(&successes, JobStatus::Running, 1), &layout);
    for n in 1..=3 {
        let marker = format!("```{}\n", keycap_number(n));
        assert_eq!(counted[0].matches(&marker).count(), 1);
    }
}

#[test]
fn risk_ordering_keeps_rendered_entries_stable() {
    init_logging();
    let layout = PageLayout::default();
    let mut successes = vec![
        success(1, None, Provenance::None),
        success(2, Some(5.0), Provenance::None),
        success(3, None, Provenance::None),
    ];
    let before = addresses_in(&render_pages(&input(&successes, JobStatus::Running, 1), &layout));
    assert_eq!(before, vec!["10.0.0.3", "10.0.0.2", "10.0.0.4"]);

    successes.push(success(4, Some(1.0), Provenance::None));
    successes.push(success(5, None, Provenance::None));
    let after = addresses_in(&render_pages(&input(&successes, JobStatus::Running, 1), &layout));
    assert_eq!(after, vec!["10.0.0.5", "10.0.0.3", "10.0.0.2", "10.0.0.4", "10.0.0.6"]);

    let survivors: Vec<_> = after.iter().filter(|a| before.contains(a)).cloned().collect();
    assert_eq!(survivors, before);
}

#[test]
fn empty_job_still_renders_a_header_page() {
    init_logging();
    let pages = render_pages(&input(&[], JobStatus::Running, 1), &PageLayout::default());
    assert_eq!(
        pages,
        vec!["**Proxy IP Results**\nChecked: 100/100 | Successful: 0\n---".to_string()]
    );
}

#[test]
fn hundreds_of_sources_keep_every_page_within_hard_limit() {
    init_logging();
    let layout = PageLayout::default();
    let ranges: Vec<(usize, String)> = (0..250)
        .map(|i| (i, format!("10.{}.{}.0/24", i / 200, i % 200)))
        .collect();
    let title = source_listing_title("Results for IP Ranges:", &ranges);
    assert!(text_len(&title) > layout.hard_limit());

    let successes: Vec<_> = (0..50)
        .map(|n| success(n, None, Provenance::Range(n)))
        .collect();
    let render = |status: JobStatus| {
        render_pages(
            &RenderInput {
                title: &title,
                successes: &successes,
                checked: 50,
                total: 250 * 254,
                status,
                source_count: ranges.len(),
            },
            &layout,
        )
    };

    let paused = render(JobStatus::Paused);
    assert!(paused.len() >= 2);
    assert!(paused[0].starts_with("**Results for IP Ranges:\n"));
    assert!(paused[0].contains(" more**\nChecked: 50/63500"));
    assert!(paused[1].starts_with("**Continuation Results for IP Ranges:**\nChecked:"));

    let finished = finalize_pages(
        render(JobStatus::Completed),
        &bounded_title(&title, &layout),
        true,
        FinalLabel::Completed,
    );
    let empty = finalize_pages(
        Vec::new(),
        &bounded_title(&title, &layout),
        false,
        FinalLabel::Cancelled,
    );
    for page in paused.iter().chain(&finished).chain(&empty) {
        assert!(
            text_len(page) <= layout.hard_limit(),
            "page of {} chars",
            text_len(page)
        );
    }
}
