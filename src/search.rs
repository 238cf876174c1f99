//! Typeahead search: raw keystrokes in, settled result lists out.
//!
//! Terms are debounced, a term identical to the search still pending is
//! dropped, and each new search cancels the one before it so only the newest
//! result is ever delivered.

use crate::service::HeroService;
use crate::types::HeroList;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Input side of a running pipeline.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    terms: mpsc::UnboundedSender<String>,
    shutdown: CancellationToken,
}

impl SearchHandle {
    /// Push one raw input value, e.g. the search box contents after a
    /// keystroke.
    pub fn search(&self, term: impl Into<String>) {
        // The driver only goes away after shutdown; late input is moot then.
        let _ = self.terms.send(term.into());
    }

    /// Stop the pipeline now, cancelling any in-flight search.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Output side: one `HeroList` per settled term.
///
/// Ends after `SearchHandle::shutdown`, or once every handle is dropped and
/// the last pending term has been searched.
#[derive(Debug)]
pub struct SearchResults {
    rx: mpsc::UnboundedReceiver<HeroList>,
}

impl Stream for SearchResults {
    type Item = HeroList;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<HeroList>> {
        self.rx.poll_recv(cx)
    }
}

/// Start a pipeline on the current tokio runtime.
pub fn spawn(service: HeroService, debounce: Duration) -> (SearchHandle, SearchResults) {
    let (terms_tx, terms_rx) = mpsc::unbounded_channel();
    let (results_tx, results_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();

    let driver = Driver {
        service,
        debounce,
        terms: terms_rx,
        results: results_tx,
        shutdown: shutdown.clone(),
        last: None,
        generation: 0,
        in_flight: None,
    };
    tokio::spawn(driver.run());

    (
        SearchHandle {
            terms: terms_tx,
            shutdown,
        },
        SearchResults { rx: results_rx },
    )
}

struct Driver {
    service: HeroService,
    debounce: Duration,
    terms: mpsc::UnboundedReceiver<String>,
    results: mpsc::UnboundedSender<HeroList>,
    shutdown: CancellationToken,
    /// Term of the search in flight, kept until its result is delivered.
    last: Option<String>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl Driver {
    async fn run(mut self) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, HeroList)>();
        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();
        let mut input_open = true;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                term = self.terms.recv(), if input_open => match term {
                    Some(term) => {
                        if let Some(dropped) = pending.replace(term) {
                            debug!(term = %dropped, "debounced");
                        }
                        deadline = Instant::now() + self.debounce;
                    }
                    None => input_open = false,
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(term) = pending.take() {
                        self.settle(term, &done_tx);
                    }
                }
                Some((generation, heroes)) = done_rx.recv() => {
                    if generation != self.generation {
                        continue;
                    }
                    self.in_flight = None;
                    self.last = None;
                    if self.results.send(heroes).is_err() {
                        break;
                    }
                }
            }

            if !input_open && pending.is_none() && self.in_flight.is_none() {
                break;
            }
        }

        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        debug!("search pipeline stopped");
    }

    fn settle(&mut self, term: String, done: &mpsc::UnboundedSender<(u64, HeroList)>) {
        if self.last.as_deref() == Some(term.as_str()) {
            debug!(%term, "unchanged term ignored");
            return;
        }
        if let Some(previous) = self.in_flight.take() {
            debug!("superseded search cancelled");
            previous.cancel();
        }

        self.generation += 1;
        self.last = Some(term.clone());
        let token = self.shutdown.child_token();
        self.in_flight = Some(token.clone());

        let generation = self.generation;
        let service = self.service.clone();
        let done = done.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                heroes = service.search(&term) => {
                    let _ = done.send((generation, heroes));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::messages::MessageLog;
    use crate::testing::{FakeTransport, BASE};
    use crate::types::Hero;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use reqwest::Method;
    use serde_json::json;
    use tokio::time::{sleep, timeout};

    const WINDOW: Duration = Duration::from_millis(300);

    fn url(term: &str) -> String {
        format!("{BASE}/api/heroes/?name={term}")
    }

    fn pipeline() -> (FakeTransport, MessageLog, SearchHandle, SearchResults) {
        let fake = FakeTransport::new();
        let log = MessageLog::new();
        let config = ClientConfig::default().with_base_url(BASE);
        let service = HeroService::new(fake.clone(), log.clone(), &config);
        let (handle, results) = spawn(service, WINDOW);
        (fake, log, handle, results)
    }

    async fn assert_quiet(results: &mut SearchResults) {
        assert!(timeout(Duration::from_secs(5), results.next()).await.is_err());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn only_the_settled_term_is_searched() {
        let (fake, _log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("abc"), json!([{ "id": 1, "name": "abcd" }]));

        handle.search("a");
        sleep(Duration::from_millis(100)).await;
        handle.search("ab");
        sleep(Duration::from_millis(150)).await;
        handle.search("abc");

        let heroes = results.next().await.unwrap();
        assert_eq!(heroes, vec![Hero { id: 1, name: "abcd".into() }]);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].request.url, url("abc"));
        assert!(
            calls[0].at >= Duration::from_millis(550) && calls[0].at < Duration::from_millis(551),
            "dispatched at {:?}",
            calls[0].at
        );
        assert_quiet(&mut results).await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn repeated_term_after_delivery_searches_again() {
        let (fake, _log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("x"), json!([]));

        handle.search("x");
        sleep(Duration::from_millis(400)).await;
        handle.search("x");

        results.next().await.unwrap();
        results.next().await.unwrap();
        let at: Vec<_> = fake.calls().into_iter().map(|c| c.at).collect();
        assert_eq!(at, vec![Duration::from_millis(300), Duration::from_millis(700)]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn repeated_term_inside_window_collapses() {
        let (fake, _log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("x"), json!([]));

        handle.search("x");
        sleep(Duration::from_millis(50)).await;
        handle.search("x");

        results.next().await.unwrap();
        assert_quiet(&mut results).await;
        assert_eq!(fake.urls(), vec![url("x")]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn unchanged_term_does_not_restart_pending_search() {
        let (fake, _log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("x"), json!([]));
        fake.delay(url("x"), Duration::from_secs(1));

        handle.search("x");
        sleep(Duration::from_millis(350)).await;
        handle.search("xy");
        sleep(Duration::from_millis(100)).await;
        handle.search("x");

        results.next().await.unwrap();
        assert_quiet(&mut results).await;
        assert_eq!(fake.urls(), vec![url("x")]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn newer_search_wins() {
        let (fake, log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("a"), json!([{ "id": 1, "name": "a" }]));
        fake.delay(url("a"), Duration::from_millis(500));
        fake.reply_json(Method::GET, url("ab"), json!([{ "id": 2, "name": "ab" }]));

        handle.search("a");
        sleep(Duration::from_millis(350)).await;
        handle.search("ab");

        let heroes = results.next().await.unwrap();
        assert_eq!(heroes, vec![Hero { id: 2, name: "ab".into() }]);
        assert_quiet(&mut results).await;

        assert_eq!(fake.urls(), vec![url("a"), url("ab")]);
        // The cancelled search never completed, so it never logged.
        assert_eq!(
            log.messages(),
            vec!["HeroService: found heroes matching \"ab\""]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn trailing_space_is_a_different_term() {
        let (fake, _log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("a"), json!([{ "id": 1, "name": "a" }]));
        fake.delay(url("a"), Duration::from_secs(1));
        fake.reply_json(Method::GET, url("a+"), json!([{ "id": 2, "name": "a " }]));

        handle.search("a");
        sleep(Duration::from_millis(350)).await;
        handle.search("a ");

        let heroes = results.next().await.unwrap();
        assert_eq!(heroes, vec![Hero { id: 2, name: "a ".into() }]);
        assert_quiet(&mut results).await;
        assert_eq!(fake.urls(), vec![url("a"), url("a+")]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn blank_term_yields_empty_list_without_backend() {
        let (fake, _log, handle, mut results) = pipeline();

        handle.search("   ");

        assert_eq!(results.next().await, Some(Vec::new()));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn dropping_handles_flushes_then_ends() {
        let (fake, _log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("ma"), json!([]));

        handle.search("ma");
        drop(handle);

        assert_eq!(results.next().await, Some(Vec::new()));
        assert_eq!(results.next().await, None);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn shutdown_cancels_in_flight_search() {
        let (fake, log, handle, mut results) = pipeline();
        fake.reply_json(Method::GET, url("ma"), json!([]));
        fake.delay(url("ma"), Duration::from_secs(1));

        handle.search("ma");
        sleep(Duration::from_millis(400)).await;
        handle.shutdown();

        assert_eq!(results.next().await, None);
        assert_eq!(fake.urls(), vec![url("ma")]);
        assert!(log.is_empty());
    }
}
