use sweep_core::{
    bounded_title, export_chunks, export_files, finalize_pages, render_pages, Controls, FinalLabel,
    JobId, JobState, JobStatus, PageLayout,
};
use sweep_logging::{sweep_error, sweep_warn};

use crate::controller::JobReport;
use crate::messenger::ensure_within_limit;
use crate::pages::PageBook;
use crate::{Affordance, Messenger, TargetId};

/// Where final output goes.
pub(crate) struct Delivery<'a> {
    pub messenger: &'a dyn Messenger,
    pub origin: &'a TargetId,
    pub forward: &'a [TargetId],
}

/// Runs once, after the job loop exits.
pub(crate) async fn finalize(
    id: JobId,
    state: &JobState,
    status: JobStatus,
    book: &mut PageBook,
    layout: &PageLayout,
    delivery: &Delivery<'_>,
) -> JobReport {
    let label = FinalLabel::from_status(status);
    let rendered = render_pages(&state.render_input(status), layout);
    let title = bounded_title(state.title(), layout);
    let pages = finalize_pages(rendered, &title, !state.results().is_empty(), label);
    if !book.sync(&pages, Controls::None).await {
        sweep_warn!("job {id}: final pages only partially delivered");
    }

    let exported = state.results().sorted_for_export();
    let limit = layout.hard_limit().min(delivery.messenger.text_limit());
    if !exported.is_empty() {
        emit_exports(id, delivery.messenger, delivery.origin, &exported, limit).await;
    }

    for target in delivery.forward {
        for page in &pages {
            send_best_effort(id, delivery.messenger, target, page).await;
        }
        if !exported.is_empty() {
            emit_exports(id, delivery.messenger, target, &exported, limit).await;
        }
    }

    let progress = state.progress();
    JobReport {
        id,
        status,
        label,
        checked: progress.checked,
        total: progress.total,
        successes: progress.successes,
        exported,
        pages,
    }
}

/// Inline chunks, then the file attachments. One failure never stops the rest.
async fn emit_exports(
    id: JobId,
    messenger: &dyn Messenger,
    target: &TargetId,
    exported: &[String],
    limit: usize,
) {
    for chunk in export_chunks(exported, limit) {
        send_best_effort(id, messenger, target, &chunk).await;
    }
    for file in export_files(id, exported) {
        if let Err(err) = messenger
            .upload(target, &file.filename, file.body.as_bytes())
            .await
        {
            sweep_error!("job {id}: uploading {} to {target} failed: {err}", file.filename);
        }
    }
}

async fn send_best_effort(id: JobId, messenger: &dyn Messenger, target: &TargetId, text: &str) {
    let result = match ensure_within_limit(text, messenger.text_limit()) {
        Ok(()) => messenger
            .send(target, text, Affordance::none(id))
            .await
            .map(|_| ()),
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        sweep_error!("job {id}: sending export to {target} failed: {err}");
    }
}
