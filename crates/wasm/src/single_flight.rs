//! Single-flight dispatch of page triggers into an [`Orchestrator`].
//!
//! Browser callbacks all run on one thread, but a render can still be
//! re-entered: a DOM write inside `show_output` may fire another handler
//! synchronously. A trigger that arrives while a render is in flight is
//! queued; when the render finishes, every queued trigger is folded into the
//! state and exactly one follow-up render runs against the newest state.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::orchestrator::{Orchestrator, ReadError, Trigger};
use crate::page::{LogLevel, Page};

/// Identifies one file read. Only the result of the newest read is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTicket(u64);

pub struct SingleFlight<P: Page> {
    orchestrator: RefCell<Orchestrator<P>>,
    pending: RefCell<VecDeque<Trigger>>,
    in_flight: Cell<bool>,
    latest_read: Cell<u64>,
}

impl<P: Page> SingleFlight<P> {
    pub fn new(orchestrator: Orchestrator<P>) -> Self {
        Self {
            orchestrator: RefCell::new(orchestrator),
            pending: RefCell::new(VecDeque::new()),
            in_flight: Cell::new(false),
            latest_read: Cell::new(0),
        }
    }

    /// Read-only access to the orchestrator, or `None` while a render holds it.
    pub fn with<R>(&self, f: impl FnOnce(&Orchestrator<P>) -> R) -> Option<R> {
        self.orchestrator.try_borrow().ok().map(|o| f(&o))
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// Start a file read. Any read started earlier becomes stale.
    pub fn begin_file_read(&self) -> ReadTicket {
        let next = self.latest_read.get() + 1;
        self.latest_read.set(next);
        ReadTicket(next)
    }

    /// Hand a finished read to the orchestrator unless a newer read has
    /// started since `ticket` was issued.
    pub fn file_loaded(&self, ticket: ReadTicket, result: Result<String, ReadError>) {
        if ticket.0 != self.latest_read.get() {
            self.with(|o| {
                o.page()
                    .log(LogLevel::Info, "ignoring result of a superseded file read")
            });
            return;
        }
        self.dispatch(Trigger::FileLoaded(result));
    }

    /// Queue `trigger` and, unless a dispatch is already running, drain the
    /// queue: apply every queued trigger, then render once if any of them
    /// asked for it. Repeats until nothing arrived during the last render.
    pub fn dispatch(&self, trigger: Trigger) {
        self.pending.borrow_mut().push_back(trigger);
        if self.in_flight.replace(true) {
            return;
        }
        loop {
            // A caller inside `with` still holds the orchestrator; leave the
            // queue for the next dispatch.
            let Ok(mut orchestrator) = self.orchestrator.try_borrow_mut() else {
                break;
            };
            let batch: Vec<Trigger> = self.pending.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            let mut needs_render = false;
            for trigger in batch {
                needs_render |= orchestrator.apply(trigger);
            }
            if needs_render {
                orchestrator.render();
            }
        }
        self.in_flight.set(false);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::{Rc, Weak};

    use covermap_core::RenderConfig;

    use super::*;
    use crate::orchestrator::WindowMetrics;

    /// Records output and, on the first `show_output`, feeds `echo` back into
    /// the dispatcher the way a synchronously firing DOM handler would.
    struct EchoPage {
        flight: Weak<SingleFlight<EchoPage>>,
        echo: Vec<Trigger>,
        outputs: Vec<String>,
        hover: bool,
        saw_in_flight: bool,
        logs: RefCell<Vec<String>>,
    }

    impl Page for EchoPage {
        fn set_drop_hover(&mut self, hover: bool) -> anyhow::Result<()> {
            self.hover = hover;
            Ok(())
        }

        fn show_output(&mut self, svg: &str) -> anyhow::Result<()> {
            self.outputs.push(svg.to_string());
            if let Some(flight) = self.flight.upgrade() {
                self.saw_in_flight |= flight.is_in_flight();
                for trigger in std::mem::take(&mut self.echo) {
                    flight.dispatch(trigger);
                }
            }
            Ok(())
        }

        fn hide_file_input(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn show_error(&mut self, _message: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn clear_error(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn log(&self, _level: LogLevel, message: &str) {
            self.logs.borrow_mut().push(message.to_string());
        }
    }

    const FIRST: &str = "mode: set\n\
        example.com/alpha/one.go:1.1,3.2 2 1\n\
        example.com/alpha/two.go:1.1,3.2 3 0\n";
    const SECOND: &str = "mode: count\n\
        example.org/beta/three.go:1.1,5.2 4 2\n";

    fn metrics(w: f64, h: f64) -> WindowMetrics {
        WindowMetrics {
            inner_width: w,
            inner_height: h,
            output_offset_top: 60.0,
            file_input_offset_height: 40.0,
        }
    }

    fn flight(echo: Vec<Trigger>) -> Rc<SingleFlight<EchoPage>> {
        let flight = Rc::new_cyclic(|weak| {
            let page = EchoPage {
                flight: weak.clone(),
                echo,
                outputs: Vec::new(),
                hover: false,
                saw_in_flight: false,
                logs: RefCell::new(Vec::new()),
            };
            SingleFlight::new(Orchestrator::new(page, RenderConfig::default()))
        });
        flight.dispatch(Trigger::Resize(metrics(800.0, 620.0)));
        flight
    }

    fn outputs(flight: &SingleFlight<EchoPage>) -> Vec<String> {
        flight.with(|o| o.page().outputs.clone()).unwrap_or_default()
    }

    #[test]
    fn plain_dispatch_renders_once() {
        let f = flight(Vec::new());
        let ticket = f.begin_file_read();
        f.file_loaded(ticket, Ok(FIRST.to_string()));
        let out = outputs(&f);
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("one.go"));
        assert!(!f.is_in_flight());
    }

    #[test]
    fn trigger_during_render_gets_one_follow_up() {
        let f = flight(vec![Trigger::Resize(metrics(400.0, 320.0))]);
        let ticket = f.begin_file_read();
        f.file_loaded(ticket, Ok(FIRST.to_string()));

        let out = outputs(&f);
        assert_eq!(out.len(), 2);
        assert!(out[0].contains(r#"viewBox="0 0 800 600""#));
        assert!(out[1].contains(r#"viewBox="0 0 400 300""#));
        assert_eq!(f.with(|o| o.page().saw_in_flight), Some(true));
        assert!(!f.is_in_flight());
    }

    #[test]
    fn queued_triggers_coalesce_into_newest_state() {
        let f = flight(vec![
            Trigger::Resize(metrics(400.0, 320.0)),
            Trigger::DragOver,
            Trigger::Resize(metrics(300.0, 220.0)),
        ]);
        let ticket = f.begin_file_read();
        f.file_loaded(ticket, Ok(FIRST.to_string()));

        let out = outputs(&f);
        assert_eq!(out.len(), 2);
        assert!(out[1].contains(r#"viewBox="0 0 300 200""#));
        assert_eq!(f.with(|o| o.page().hover), Some(true));
    }

    #[test]
    fn read_finishing_mid_render_is_not_lost() {
        let f = flight(vec![Trigger::FileLoaded(Ok(SECOND.to_string()))]);
        let ticket = f.begin_file_read();
        f.file_loaded(ticket, Ok(FIRST.to_string()));

        let out = outputs(&f);
        assert_eq!(out.len(), 2);
        assert!(out[1].contains("three.go"));
        assert_eq!(
            f.with(|o| o.state().file_text.clone()),
            Some(Some(SECOND.to_string()))
        );
    }

    #[test]
    fn follow_up_without_state_change_does_not_render() {
        let f = flight(vec![
            Trigger::DragEnd,
            Trigger::Resize(metrics(500.0, 24.0)),
        ]);
        let ticket = f.begin_file_read();
        f.file_loaded(ticket, Ok(FIRST.to_string()));
        assert_eq!(outputs(&f).len(), 1);
    }

    #[test]
    fn stale_read_is_ignored() {
        let f = flight(Vec::new());
        let slow = f.begin_file_read();
        let fast = f.begin_file_read();
        f.file_loaded(fast, Ok(SECOND.to_string()));
        f.file_loaded(slow, Ok(FIRST.to_string()));

        let out = outputs(&f);
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("three.go"));
        let logs = f.with(|o| o.page().logs.borrow().clone()).unwrap_or_default();
        assert!(logs.iter().any(|m| m.contains("superseded")));
    }

    #[test]
    fn dispatch_inside_a_reader_waits_for_the_next_dispatch() {
        let f = flight(Vec::new());
        f.with(|_| f.dispatch(Trigger::DragOver));
        assert!(!f.is_in_flight());
        assert_eq!(f.with(|o| o.page().hover), Some(false));

        f.dispatch(Trigger::DragEnd);
        // Both queued triggers ran in order, leaving hover off.
        assert_eq!(f.with(|o| o.page().hover), Some(false));
        assert_eq!(f.pending.borrow().len(), 0);
    }
}
