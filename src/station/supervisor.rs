use log::{info, warn};
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    config::StationConfig,
    connector::Connector,
    dispatcher::ResetLatch,
    modem::{RetryPacer, WifiModem},
    types::ConnectError,
};

/// Observable link state of the supervised station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStateId {
    Unjoined = 0,
    Joined = 1,
}

impl LinkStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug)]
enum LinkEvent {
    /// Periodic sample of the driver's join flag.
    Poll { joined: bool },
    /// A modem reset was latched since the previous tick.
    ResetNotice,
}

#[derive(Clone, Copy, Debug, Default)]
struct PollContext {
    connect_requested: bool,
}

struct LinkHsm {
    state_id: LinkStateId,
}

impl LinkHsm {
    fn new() -> Self {
        Self {
            state_id: LinkStateId::Unjoined,
        }
    }
}

#[state_machine(initial = "State::unjoined()")]
impl LinkHsm {
    #[state]
    fn unjoined(&mut self, context: &mut PollContext, event: &LinkEvent) -> Outcome<State> {
        match event {
            LinkEvent::Poll { joined: true } => {
                self.state_id = LinkStateId::Joined;
                info!("station link up");
                Transition(State::joined())
            }
            LinkEvent::Poll { joined: false } | LinkEvent::ResetNotice => {
                context.connect_requested = true;
                Handled
            }
        }
    }

    #[state]
    fn joined(&mut self, context: &mut PollContext, event: &LinkEvent) -> Outcome<State> {
        match event {
            LinkEvent::Poll { joined: true } => Handled,
            LinkEvent::Poll { joined: false } => {
                self.state_id = LinkStateId::Unjoined;
                warn!("station link lost");
                context.connect_requested = true;
                Transition(State::unjoined())
            }
            LinkEvent::ResetNotice => {
                self.state_id = LinkStateId::Unjoined;
                warn!("station link reset by modem");
                context.connect_requested = true;
                Transition(State::unjoined())
            }
        }
    }
}

/// Periodically samples the driver's join flag and drives the connector
/// whenever the link is down. One tick per poll interval.
pub struct Supervisor<'a> {
    machine: statig::blocking::StateMachine<LinkHsm>,
    connector: Connector<'a>,
    config: &'a StationConfig,
    reset_latch: &'a ResetLatch,
}

impl<'a> Supervisor<'a> {
    pub fn new(config: &'a StationConfig, reset_latch: &'a ResetLatch) -> Self {
        Self {
            machine: LinkHsm::new().state_machine(),
            connector: Connector::new(config),
            config,
            reset_latch,
        }
    }

    pub fn link_state(&self) -> LinkStateId {
        self.machine.inner().state_id
    }

    /// One supervision tick. Samples the join flag, folds in a latched
    /// reset, and runs an unlimited connection cycle when the link needs
    /// re-establishing. Only a fatal modem failure returns an error.
    pub async fn tick<M: WifiModem, P: RetryPacer>(
        &mut self,
        modem: &mut M,
        pacer: &mut P,
    ) -> Result<(), ConnectError> {
        let mut context = PollContext::default();

        if self.reset_latch.take() && self.config.rejoin_on_reset {
            self.machine
                .handle_with_context(&LinkEvent::ResetNotice, &mut context);
        }

        self.machine.handle_with_context(
            &LinkEvent::Poll {
                joined: modem.is_joined(),
            },
            &mut context,
        );

        if context.connect_requested {
            self.connector.connect(modem, pacer, true).await?;
        }
        Ok(())
    }

    /// Supervision loop: tick, sleep one poll interval, repeat. Returns only
    /// on a fatal modem failure.
    pub async fn run<M: WifiModem, P: RetryPacer>(
        &mut self,
        modem: &mut M,
        pacer: &mut P,
    ) -> Result<core::convert::Infallible, ConnectError> {
        loop {
            self.tick(modem, pacer).await?;
            pacer.pause().await;
        }
    }
}
