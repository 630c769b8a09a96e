mod common;

use std::collections::HashMap;

use common::{fast_settings, init_logging, with_timeout, FakeOracle, RecordingMessenger};
use pretty_assertions::assert_eq;
use sweep_core::{keycap_number, Provenance};
use sweep_engine::{
    CheckError, FailureKind, Intake, IntakeError, Resolver, SweepEngine, TargetId,
};

struct FakeResolver {
    answers: HashMap<&'static str, Vec<&'static str>>,
}

#[async_trait::async_trait]
impl Resolver for FakeResolver {
    async fn resolve(&self, domain: &str) -> Result<Vec<String>, CheckError> {
        self.answers
            .get(domain)
            .map(|ips| ips.iter().map(|ip| ip.to_string()).collect())
            .ok_or_else(|| CheckError {
                kind: FailureKind::Rejected,
                message: "resolution failed".into(),
            })
    }
}

fn resolver() -> FakeResolver {
    FakeResolver {
        answers: HashMap::from([
            ("a.example", vec!["203.0.113.7", "203.0.113.8"]),
            ("b.example", vec!["203.0.113.9", "203.0.113.7"]),
            ("empty.example", vec![]),
        ]),
    }
}

#[tokio::test]
async fn shared_address_across_domains_is_kept_once() {
    init_logging();
    let intake = Intake::from_domains(&resolver(), &["a.example", "b.example"])
        .await
        .unwrap();

    assert_eq!(
        intake.title,
        format!(
            "Results for Domains:\n{} `a.example`\n{} `b.example`",
            keycap_number(1),
            keycap_number(2)
        )
    );
    assert_eq!(intake.source_count, 2);
    assert_eq!(intake.candidates.duplicates_dropped(), 1);
    let tagged: Vec<(&str, Provenance)> = intake
        .candidates
        .iter()
        .map(|c| (c.address(), c.provenance()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("203.0.113.7", Provenance::Domain(0)),
            ("203.0.113.8", Provenance::Domain(0)),
            ("203.0.113.9", Provenance::Domain(1)),
        ]
    );

    let engine = SweepEngine::new(
        FakeOracle::open(|_| true),
        RecordingMessenger::new(),
        fast_settings(),
    );
    let report = with_timeout(engine.start(intake.into_spec(TargetId::from("chat"))).wait())
        .await
        .unwrap();
    assert_eq!(
        report.exported,
        vec!["203.0.113.7", "203.0.113.8", "203.0.113.9"]
    );
    assert_eq!(report.pages[0].matches("203.0.113.7").count(), 1);
}

#[tokio::test]
async fn failed_and_invalid_domains_are_skipped() {
    init_logging();
    let intake = Intake::from_domains(
        &resolver(),
        &["https://a.example", "missing.example", "empty.example", "b.example"],
    )
    .await
    .unwrap();

    assert_eq!(intake.skipped.len(), 3);
    assert_eq!(intake.candidates.len(), 2);
    assert!(intake
        .candidates
        .iter()
        .all(|c| c.provenance() == Provenance::Domain(3)));
    assert_eq!(
        intake.title,
        format!("Results for Domains:\n{} `b.example`", keycap_number(4))
    );

    assert_eq!(
        Intake::from_domains(&resolver(), &["missing.example"]).await,
        Err(IntakeError::NoCandidates)
    );
}

#[tokio::test]
async fn single_domain_is_untagged() {
    init_logging();
    let intake = Intake::from_domains(&resolver(), &["a.example"]).await.unwrap();
    assert_eq!(intake.title, "Results for: `a.example`");
    assert!(intake
        .candidates
        .iter()
        .all(|c| c.provenance() == Provenance::None));
}

#[test]
fn ranges_expand_and_tag() {
    init_logging();
    let intake = Intake::from_ranges(&["10.0.0.0/30", "not a range", "10.0.1.1-3"]).unwrap();

    let tagged: Vec<(&str, Provenance)> = intake
        .candidates
        .iter()
        .map(|c| (c.address(), c.provenance()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("10.0.0.1", Provenance::Range(0)),
            ("10.0.0.2", Provenance::Range(0)),
            ("10.0.1.1", Provenance::Range(2)),
            ("10.0.1.2", Provenance::Range(2)),
            ("10.0.1.3", Provenance::Range(2)),
        ]
    );
    assert_eq!(intake.skipped.len(), 1);
    assert_eq!(
        intake.title,
        format!(
            "Results for IP Ranges:\n{} `10.0.0.0/30`\n{} `10.0.1.1-3`",
            keycap_number(1),
            keycap_number(3)
        )
    );

    let single = Intake::from_ranges(&["192.0.2.10-12"]).unwrap();
    assert_eq!(single.title, "IP Range Results");
    assert_eq!(single.candidates.len(), 3);
    assert_eq!(Intake::from_ranges(&["10.0.0.0/8"]), Err(IntakeError::NoCandidates));
}

#[test]
fn plain_addresses_deduplicate() {
    init_logging();
    let intake = Intake::from_addresses(["1.1.1.1", " 1.1.1.1 ", "", "8.8.8.8:443"]).unwrap();
    assert_eq!(intake.title, "Proxy IP Results");
    assert_eq!(intake.candidates.len(), 2);
    assert_eq!(
        Intake::from_addresses(Vec::<String>::new()),
        Err(IntakeError::NoCandidates)
    );
}
