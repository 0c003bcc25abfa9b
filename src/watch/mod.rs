//! Watch mode: filesystem events to debounced rebuilds.
//!
//! ```text
//! notify watcher -> channel -> Debouncer -> extension dispatch -> pipeline
//! ```
//!
//! Rebuilds run synchronously on the watch thread: events arriving
//! mid-build buffer in the channel and coalesce into the next batch
//! (run-after-current policy), so two pipeline runs never race on the
//! same output file. Ctrl+C lets an in-flight rebuild finish, then exits.

mod debouncer;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::pipeline;
use crate::template::ParameterSet;
use crate::{core, log, logger};
use debouncer::{ChangeKind, Debouncer};

/// Which pipelines a batch of changed paths touches.
#[derive(Debug, Default, Clone, Copy)]
struct Dirty {
    css: bool,
    html: bool,
    js: bool,
}

impl Dirty {
    fn any(self) -> bool {
        self.css || self.html || self.js
    }
}

/// Route changed paths to pipelines by file extension.
fn classify<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> Dirty {
    let mut dirty = Dirty::default();
    for path in paths {
        match path.extension().and_then(|e| e.to_str()) {
            Some("scss" | "sass") => dirty.css = true,
            Some("html") => dirty.html = true,
            Some("js") => dirty.js = true,
            _ => {}
        }
    }
    dirty
}

/// Run the watch loop until interrupted.
pub fn run(config: &Config, params: &ParameterSet) -> Result<()> {
    let (event_tx, event_rx) = crossbeam::channel::unbounded();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("failed to create filesystem watcher")?;

    let mut watched = 0usize;
    for root in config.watch_roots() {
        if root.exists() {
            watcher
                .watch(&root, RecursiveMode::Recursive)
                .with_context(|| format!("failed to watch `{}`", root.display()))?;
            watched += 1;
        } else {
            log!("warning"; "watch root missing, skipping: {}", root.display());
        }
    }

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::bounded(1);
    core::register_shutdown_channel(shutdown_tx);

    log!("watch"; "watching {watched} root(s), Ctrl+C to stop");

    let mut debouncer = Debouncer::new(&config.watch);
    loop {
        if core::is_shutdown() {
            break;
        }

        crossbeam::select! {
            recv(event_rx) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(err)) => log!("watch"; "notify error: {err}"),
                Err(_) => break, // watcher thread gone
            },
            recv(shutdown_rx) -> _ => break,
            default(debouncer.sleep_duration()) => {
                if let Some(changes) = debouncer.take_if_ready() {
                    rebuild(config, params, &changes);
                }
            }
        }
    }

    log!("watch"; "shutting down");
    Ok(())
}

/// Rebuild every pipeline a batch touches, once.
fn rebuild(config: &Config, params: &ParameterSet, changes: &FxHashMap<PathBuf, ChangeKind>) {
    let dirty = classify(changes.keys());
    if !dirty.any() {
        return;
    }

    for (path, kind) in changes {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }

    let mut summary = pipeline::BuildSummary::default();
    if dirty.css {
        summary.merge(pipeline::css::build_all_css(config));
    }
    if dirty.html {
        if let Some(url) = params.get("url").filter(|url| !url.is_empty()) {
            pipeline::html::copy_for_domain(config, url);
        }
        summary.merge(pipeline::html::build_all_html(config, params));
    }
    if dirty.js {
        summary.merge(pipeline::js::build_all_js(config));
    }

    match summary.first_failure() {
        None => logger::status_success(&format!(
            "rebuilt {} unit(s) after {} change(s)",
            summary.total(),
            changes.len()
        )),
        Some((unit, error)) => logger::status_error(
            &format!("{} of {} unit(s) failed", summary.failed(), summary.total()),
            &format!("{unit}: {error}"),
        ),
    }
}

// =============================================================================
// Tests
// =============================================================================
