use crate::types::{LogSummary, PodEvent, PodRef};
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use kube::api::WatchEvent;
use std::path::{Path, PathBuf};

/// `<home>/.kube/config`
pub fn default_kubeconfig(home: &Path) -> PathBuf {
    home.join(".kube").join("config")
}

pub fn pod_ref(pod: &Pod) -> PodRef {
    PodRef {
        namespace: pod.namespace().unwrap_or_default(),
        name: pod.name_any(),
    }
}

pub fn pod_phase(pod: &Pod) -> &str {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .unwrap_or("")
}

/// Format a pod for the initial listing.
pub fn format_pod_line(pod: &Pod) -> String {
    format!("- {} (Phase: {})", pod_ref(pod), pod_phase(pod))
}

pub fn matches_prefix(name: &str, prefix: &str) -> bool {
    name.as_bytes().starts_with(prefix.as_bytes())
}

/// Count newline-separated segments and the ones mentioning "error" in any case.
///
/// A trailing newline produces a trailing empty segment, which is counted.
pub fn summarize_log(content: &str) -> LogSummary {
    content
        .split('\n')
        .fold(LogSummary::default(), |mut summary, line| {
            summary.lines += 1;
            if line.to_lowercase().contains("error") {
                summary.errors += 1;
            }
            summary
        })
}

/// Classify a raw watch item.
///
/// Anything the API server sent that isn't a pod (a status object, an error line,
/// a foreign kind that fails to decode) becomes `Unrecognized`. Transport errors
/// are passed back to the caller since they end the subscription.
pub fn classify_event(
    item: Result<WatchEvent<Pod>, kube::Error>,
) -> Result<PodEvent, kube::Error> {
    match item {
        Ok(WatchEvent::Added(pod)) => Ok(PodEvent::Added(pod_ref(&pod))),
        Ok(WatchEvent::Modified(pod)) => Ok(PodEvent::Modified(pod_ref(&pod))),
        Ok(WatchEvent::Deleted(pod)) => Ok(PodEvent::Deleted(pod_ref(&pod))),
        Ok(WatchEvent::Error(_)) => Ok(PodEvent::Unrecognized),
        // bookmarks
        Ok(_) => Ok(PodEvent::Ignored),
        Err(kube::Error::SerdeError(_)) | Err(kube::Error::Api(_)) => Ok(PodEvent::Unrecognized),
        Err(e) => Err(e),
    }
}

/// The line printed for an event, if any.
pub fn format_event(event: &PodEvent) -> Option<String> {
    match event {
        PodEvent::Added(pod) => Some(format!("[ADDED] Pod: {}", pod)),
        PodEvent::Modified(pod) => Some(format!("[MODIFIED] Pod: {}", pod)),
        PodEvent::Deleted(pod) => Some(format!("[DELETED] Pod: {}", pod)),
        PodEvent::Unrecognized => Some("Unexpected type".to_string()),
        PodEvent::Ignored => None,
    }
}
