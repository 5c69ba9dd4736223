//! Interactive session: the event loop around the throttle controller.
//!
//! Two kinds of events drive a session: an input line (the field value being
//! submitted) and a tick of the controller's re-check timer. Events are handled
//! one at a time, each to completion, so the controller needs no locking.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::result::{CheckResult, ResultSink};
use crate::throttle::{Admission, ThrottleController, TickOutcome};
use crate::transport::{RequestTransport, TransportError};
use crate::validate::validate_url;

pub struct Session<S> {
    controller: ThrottleController,
    transport: Arc<dyn RequestTransport>,
    sink: S,
    max_url_length: usize,
}

impl<S: ResultSink> Session<S> {
    pub fn new(
        controller: ThrottleController,
        transport: Arc<dyn RequestTransport>,
        sink: S,
        max_url_length: usize,
    ) -> Self {
        Self {
            controller,
            transport,
            sink,
            max_url_length,
        }
    }

    pub fn controller(&self) -> &ThrottleController {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Show any throttle carried over from an earlier session.
    pub fn start(&mut self) {
        self.controller.show_pending_notice(&mut self.sink);
    }

    /// Handle one submitted field value. Returns what was rendered in the
    /// result area, or `None` if the input failed validation.
    pub async fn handle_input(&mut self, input: &str) -> Option<CheckResult> {
        if let Err(rejection) = validate_url(input, self.max_url_length) {
            tracing::debug!(%rejection, "input rejected by url check");
            self.sink.notify(&rejection.to_string());
            return None;
        }
        self.sink.clear_notice();

        match self.controller.submit(input, &mut self.sink) {
            Admission::Forward(url) => {
                let result = self.forward(url).await;
                self.sink.render(&result);
                Some(result)
            }
            Admission::Throttled(notice) => Some(notice),
        }
    }

    /// Timer tick.
    pub fn tick(&mut self) -> TickOutcome {
        self.controller.check_expiration(&mut self.sink)
    }

    async fn forward(&self, url: String) -> CheckResult {
        let transport = Arc::clone(&self.transport);
        let target = url.clone();
        let outcome = tokio::task::spawn_blocking(move || transport.check(&target))
            .await
            .unwrap_or_else(|e| Err(TransportError::Task(e.to_string())));
        match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(url = %url, "check request failed: {}", e);
                CheckResult::error(url, e.to_string())
            }
        }
    }

    /// Read field values line by line until EOF, interleaved with timer ticks.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.start();
        let mut show_prompt = true;

        loop {
            if show_prompt {
                self.sink.prompt(self.controller.input_enabled());
                show_prompt = false;
            }
            let wait = self.controller.until_next_tick();

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    self.handle_input(line.trim()).await;
                    show_prompt = true;
                }
                _ = sleep_or_forever(wait) => {
                    if self.tick() == TickOutcome::Released {
                        show_prompt = true;
                    }
                }
            }
        }

        tracing::debug!("input closed, session ends");
        Ok(())
    }
}

async fn sleep_or_forever(wait: Option<Duration>) {
    match wait {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock, Timestamp};
    use crate::config::ThrottleConfig;
    use crate::storage::{MemoryStore, ThrottleStore};
    use crate::throttle::THROTTLED_MESSAGE;
    use crate::transport::MockTransport;
    use crate::validate::DEFAULT_MAX_URL_LENGTH;

    #[derive(Default)]
    struct Recorder {
        rendered: Vec<CheckResult>,
        notices: Vec<String>,
        prompts: Vec<bool>,
    }

    impl ResultSink for Recorder {
        fn render(&mut self, result: &CheckResult) {
            self.rendered.push(result.clone());
        }

        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }

        fn clear_notice(&mut self) {}

        fn prompt(&mut self, input_enabled: bool) {
            self.prompts.push(input_enabled);
        }
    }

    struct Unreachable;

    impl RequestTransport for Unreachable {
        fn check(&self, _url: &str) -> Result<CheckResult, TransportError> {
            Err(TransportError::Http(503))
        }
    }

    fn session(limit: u32, transport: Arc<dyn RequestTransport>) -> (Session<Recorder>, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_millis(1_700_000_000_000));
        let cfg = ThrottleConfig {
            request_limit: limit,
            ..ThrottleConfig::default()
        };
        let controller = ThrottleController::new(cfg, clock.clone(), ThrottleStore::new(MemoryStore::new()));
        (
            Session::new(controller, transport, Recorder::default(), DEFAULT_MAX_URL_LENGTH),
            clock,
        )
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_controller() {
        let (mut s, _) = session(1, Arc::new(MockTransport));
        assert!(s.handle_input("not a url").await.is_none());
        assert_eq!(s.sink().notices, vec!["Error: URL is invalid.".to_string()]);
        assert_eq!(s.controller().request_count(), 0);
    }

    #[tokio::test]
    async fn admitted_input_renders_transport_result() {
        let (mut s, _) = session(1, Arc::new(MockTransport));
        let r = s.handle_input("https://example.com/a").await.unwrap();
        assert!(r.exists && r.file && !r.folder);
        assert_eq!(s.sink().rendered, vec![r]);
    }

    #[tokio::test]
    async fn transport_error_is_rendered_and_consumes_quota() {
        let (mut s, _) = session(1, Arc::new(Unreachable));
        let r = s.handle_input("https://example.com/a").await.unwrap();
        assert_eq!(r, CheckResult::error("https://example.com/a", "HTTP 503"));
        assert_eq!(s.controller().request_count(), 1);

        let second = s.handle_input("https://example.com/b").await.unwrap();
        assert!(second.error.starts_with("Wait period ends at "));
        assert!(!s.controller().input_enabled());
    }

    #[tokio::test]
    async fn run_processes_lines_until_eof() {
        let (mut s, _) = session(1, Arc::new(MockTransport));
        let input: &[u8] = b"https://a.example.com/\nbad url\n  https://b.example.com/  \n";
        s.run(input).await.unwrap();

        let sink = s.into_sink();
        assert_eq!(sink.rendered.len(), 2);
        assert!(sink.rendered[0].exists);
        assert_eq!(sink.rendered[1].url, "https://b.example.com/");
        assert!(sink.rendered[1].is_error());
        assert_eq!(
            sink.notices,
            vec!["Error: URL is invalid.".to_string(), THROTTLED_MESSAGE.to_string()]
        );
        assert_eq!(sink.prompts, vec![true, true, true, false]);
    }

    #[tokio::test]
    async fn tick_releases_after_expiration() {
        let (mut s, clock) = session(0, Arc::new(MockTransport));
        s.handle_input("https://example.com/").await.unwrap();
        assert_eq!(s.tick(), TickOutcome::StillThrottled);
        clock.advance(Duration::from_secs(30 * 60));
        assert_eq!(s.tick(), TickOutcome::Released);
        assert!(s.controller().input_enabled());
        assert_eq!(s.tick(), TickOutcome::Idle);
    }

    /// Wall clock that follows tokio's (pausable) time source.
    struct TokioClock {
        base: tokio::time::Instant,
        start: Timestamp,
    }

    impl Clock for TokioClock {
        fn now(&self) -> Timestamp {
            self.start.saturating_add(self.base.elapsed())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn run_releases_throttle_from_timer_without_input() {
        use tokio::io::{AsyncWriteExt, BufReader};

        let clock = TokioClock {
            base: tokio::time::Instant::now(),
            start: Timestamp::from_millis(1_700_000_000_000),
        };
        let cfg = ThrottleConfig {
            request_limit: 0,
            ..ThrottleConfig::default()
        };
        let controller = ThrottleController::new(cfg, clock, ThrottleStore::new(MemoryStore::new()));
        let mut s = Session::new(controller, Arc::new(MockTransport), Recorder::default(), DEFAULT_MAX_URL_LENGTH);

        let (reader, mut writer) = tokio::io::duplex(64);
        let feeder = tokio::spawn(async move {
            writer.write_all(b"https://example.com/\n").await.unwrap();
            // Stay idle well past the 30 minute window, then close input.
            tokio::time::sleep(Duration::from_secs(45 * 60)).await;
            drop(writer);
        });

        s.run(BufReader::new(reader)).await.unwrap();
        feeder.await.unwrap();

        assert!(s.controller().input_enabled());
        assert_eq!(s.controller().request_count(), 0);
        assert!(s.controller().timer().is_none());
        let sink = s.into_sink();
        assert_eq!(sink.notices, vec![THROTTLED_MESSAGE.to_string()]);
        assert_eq!(sink.rendered.len(), 1);
        assert!(sink.rendered[0].error.starts_with("Wait period ends at "));
        // Initial prompt, locked after the throttled line, unlocked by the timer.
        assert_eq!(sink.prompts, vec![true, false, true]);
    }
}
