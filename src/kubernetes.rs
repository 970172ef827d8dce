use crate::types::PodEvent;
use crate::utils::{classify_event, format_event, format_pod_line, matches_prefix, summarize_log};
use anyhow::Context;
use futures::io::AsyncReadExt;
use futures::stream::{Stream, StreamExt};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ListParams, LogParams, WatchEvent, WatchParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config, ResourceExt};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Build the one client used for every call.
///
/// With no kubeconfig path (no home directory and no flag) the configuration is
/// inferred from the environment, which covers running inside a cluster.
pub async fn init_client(kubeconfig: Option<&Path>, context: Option<&str>) -> anyhow::Result<Client> {
    let config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("failed to read kubeconfig from {}", path.display()))?;
            let context_name = context
                .map(str::to_string)
                .or_else(|| kubeconfig.current_context.clone())
                .unwrap_or_else(|| "default".to_string());
            let options = KubeConfigOptions {
                context: context.map(str::to_string),
                ..Default::default()
            };
            let config = Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .with_context(|| format!("failed to load context '{}'", context_name))?;
            info!("Using context {} from {}", context_name, path.display());
            config
        }
        None => {
            info!("No kubeconfig path available, inferring configuration");
            Config::infer()
                .await
                .context("failed to infer kubernetes configuration")?
        }
    };
    Client::try_from(config).context("failed to create kubernetes client")
}

/// Print every pod in every namespace. Returns the number of pods printed.
pub async fn list_pods(client: &Client, out: &mut impl Write) -> anyhow::Result<usize> {
    let api: Api<Pod> = Api::all(client.clone());
    let pods = api
        .list(&ListParams::default())
        .await
        .context("failed to list pods")?;

    writeln!(out, "Listing current Pods:")?;
    for pod in &pods.items {
        writeln!(out, "{}", format_pod_line(pod))?;
    }
    Ok(pods.items.len())
}

/// Fetch the current logs of each container of each pod in `namespace` whose name
/// starts with `prefix`, and print a line/error count per container.
///
/// Failures here never abort the program: a failed namespace listing skips the
/// whole step, a failed log fetch skips that one container. Only write errors
/// are returned.
pub async fn summarize_logs(
    client: &Client,
    namespace: &str,
    prefix: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let api: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let pods = match api.list(&ListParams::default()).await {
        Ok(pods) => pods,
        Err(e) => {
            warn!("Listing pods in namespace {} failed: {}", namespace, e);
            writeln!(out, "Error listing pods: {}", e)?;
            return Ok(());
        }
    };

    writeln!(out, "\nFetching logs for pods starting with '{}':", prefix)?;
    for pod in pods.items.iter().filter(|p| matches_prefix(&p.name_any(), prefix)) {
        let name = pod.name_any();
        let pod_namespace = pod.namespace().unwrap_or_else(|| namespace.to_string());
        let containers = pod.spec.as_ref().map(|s| s.containers.as_slice()).unwrap_or_default();

        for container in containers {
            writeln!(
                out,
                "  --> Getting logs for {}/{} [container: {}]",
                pod_namespace, name, container.name
            )?;
            debug!("Opening log stream for {}/{} [{}]", pod_namespace, name, container.name);

            let lp = LogParams {
                container: Some(container.name.clone()),
                ..Default::default()
            };
            let mut logs = match api.log_stream(&name, &lp).await {
                Ok(stream) => Box::pin(stream),
                Err(e) => {
                    warn!("Could not get logs for {}/{}: {}", name, container.name, e);
                    writeln!(out, "    [ERROR] Could not get logs: {}", e)?;
                    continue;
                }
            };

            let mut buf = Vec::new();
            if let Err(e) = logs.read_to_end(&mut buf).await {
                warn!("Reading logs for {}/{} failed: {}", name, container.name, e);
                writeln!(out, "    [ERROR] Reading logs: {}", e)?;
                continue;
            }

            let summary = summarize_log(&String::from_utf8_lossy(&buf));
            writeln!(out, "    [SUMMARY] {}", summary)?;
        }
    }
    Ok(())
}

/// Watch pod events in all namespaces until the server closes the stream or
/// `shutdown` resolves.
///
/// kube caps a watch at under 295 seconds of server-side timeout and always sends
/// one (290s by default), so without a shutdown signal this returns once the API
/// server ends the watch. There is no re-watch.
///
/// A rejected watch (401, 403, ...) is answered with a `Status` body that kube
/// surfaces as the first stream item rather than from `watch` itself; that is
/// returned as an error like any other subscribe failure.
pub async fn watch_pods(
    client: &Client,
    out: &mut impl Write,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    writeln!(out, "\nWatching for Pod events:")?;

    let api: Api<Pod> = Api::all(client.clone());
    let wp = WatchParams::default().disable_bookmarks();
    let mut stream = api
        .watch(&wp, "0")
        .await
        .context("failed to watch pods")?
        .boxed();
    info!("Watching pods in all namespaces");

    tokio::pin!(shutdown);
    let first = tokio::select! {
        _ = &mut shutdown => {
            info!("Shutdown requested, closing pod watch");
            return Ok(());
        }
        first = stream.next() => first,
    };
    let first = match first {
        Some(Err(err @ kube::Error::Api(_))) => {
            return Err(anyhow::Error::new(err).context("failed to watch pods"));
        }
        other => other,
    };

    run_watch_loop(futures::stream::iter(first).chain(stream), out, shutdown).await
}

/// Print each event from `stream` until it ends or `shutdown` resolves.
pub async fn run_watch_loop<S>(
    mut stream: S,
    out: &mut impl Write,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()>
where
    S: Stream<Item = Result<WatchEvent<Pod>, kube::Error>> + Unpin,
{
    let started = Instant::now();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, closing pod watch after {}s", started.elapsed().as_secs());
                return Ok(());
            }
            item = stream.next() => {
                let Some(item) = item else {
                    info!("Pod watch closed by the server after {}s", started.elapsed().as_secs());
                    return Ok(());
                };
                match classify_event(item) {
                    Ok(event) => {
                        if event == PodEvent::Unrecognized {
                            debug!("Skipping watch event without a pod payload");
                        }
                        if let Some(line) = format_event(&event) {
                            writeln!(out, "{}", line)?;
                        }
                    }
                    Err(e) => {
                        warn!(
                            "Pod watch stream failed after {}s: {}",
                            started.elapsed().as_secs(),
                            e
                        );
                        return Ok(());
                    }
                }
            }
        }
    }
}
