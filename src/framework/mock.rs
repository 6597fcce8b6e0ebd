//! # Mock Ticket Office
//!
//! Utilities for testing travelers without a real ticket office.
//!
//! [`MockTicketOffice`] hands out a real [`TicketClient`] whose registrations
//! are answered from a list of expectations, matched by traveler id so that
//! concurrent travelers may register in any order. Use it to script a denial,
//! or an office that never answers, and then check what the traveler did.
//!
//! # Example
//! ```ignore
//! let mut mock = MockTicketOffice::new();
//! mock.expect_registration(TravelerId(1)).reply_denied();
//! mock.expect_registration(TravelerId(2)).withhold_reply();
//!
//! let client = mock.client();
//! // run travelers with `client`...
//! mock.verify(); // every expectation was consumed, no surprises
//! ```

use crate::clients::TicketClient;
use crate::model::{TicketMessage, TravelerId};
use crate::ticket_office::TicketRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// What the mock does with one expected registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Authorize,
    Deny,
    /// Keep the reply channel open and never answer.
    Withhold,
    /// The registration expects no reply (priority travelers, dependents).
    None,
}

#[derive(Debug)]
struct Expectation {
    traveler: TravelerId,
    answer: Answer,
}

#[derive(Default)]
struct Script {
    expectations: VecDeque<Expectation>,
    registrations: Vec<TicketMessage>,
    mismatches: Vec<String>,
    withheld: Vec<oneshot::Sender<TicketMessage>>,
}

type Shared = Arc<Mutex<Script>>;

fn lock(script: &Shared) -> std::sync::MutexGuard<'_, Script> {
    script.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted ticket office.
pub struct MockTicketOffice {
    client: TicketClient,
    script: Shared,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockTicketOffice {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<TicketRequest>(100);
        let script: Shared = Arc::default();
        let script_clone = script.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut script = lock(&script_clone);
                script.registrations.push(request.message.clone());
                let traveler = request.message.traveler_id;
                let expectation = script
                    .expectations
                    .iter()
                    .position(|exp| exp.traveler == traveler)
                    .and_then(|i| script.expectations.remove(i));

                match (expectation, request.reply_to) {
                    (Some(exp), Some(reply_to)) => match exp.answer {
                        Answer::Authorize => {
                            let _ = reply_to.send(request.message.reply(true));
                        }
                        Answer::Deny => {
                            let _ = reply_to.send(request.message.reply(false));
                        }
                        Answer::Withhold => script.withheld.push(reply_to),
                        Answer::None => script.mismatches.push(format!(
                            "{} expects a reply but was scripted without one",
                            request.message.traveler_id
                        )),
                    },
                    (Some(exp), None) => {
                        if exp.answer != Answer::None {
                            script.mismatches.push(format!(
                                "{} registered without a reply channel",
                                request.message.traveler_id
                            ));
                        }
                    }
                    (None, _) => script.mismatches.push(format!(
                        "unexpected registration of {}",
                        request.message.traveler_id
                    )),
                }
            }
        });

        Self {
            client: TicketClient::new(sender),
            script,
            _handle: handle,
        }
    }

    /// Returns a client for the travelers under test.
    pub fn client(&self) -> TicketClient {
        self.client.clone()
    }

    /// Expects one registration from `traveler`.
    pub fn expect_registration(&mut self, traveler: TravelerId) -> RegistrationBuilder {
        RegistrationBuilder {
            traveler,
            script: self.script.clone(),
        }
    }

    /// Every registration received so far, in arrival order.
    pub fn registrations(&self) -> Vec<TicketMessage> {
        lock(&self.script).registrations.clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let script = lock(&self.script);
        if !script.mismatches.is_empty() {
            panic!("Unexpected registrations: {:?}", script.mismatches);
        }
        if !script.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                script.expectations.len()
            );
        }
    }
}

impl Default for MockTicketOffice {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one expected registration.
pub struct RegistrationBuilder {
    traveler: TravelerId,
    script: Shared,
}

impl RegistrationBuilder {
    fn push(self, answer: Answer) {
        lock(&self.script).expectations.push_back(Expectation {
            traveler: self.traveler,
            answer,
        });
    }

    pub fn reply_authorized(self) {
        self.push(Answer::Authorize);
    }

    pub fn reply_denied(self) {
        self.push(Answer::Deny);
    }

    /// Accept the registration but never answer it.
    pub fn withhold_reply(self) {
        self.push(Answer::Withhold);
    }

    /// The registration is exempt and gets no reply.
    pub fn without_reply(self) {
        self.push(Answer::None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TravelerProfile;

    #[tokio::test]
    async fn answers_from_the_script() {
        let mut mock = MockTicketOffice::new();
        mock.expect_registration(TravelerId(1)).reply_authorized();
        mock.expect_registration(TravelerId(2)).reply_denied();
        mock.expect_registration(TravelerId(3)).without_reply();
        let client = mock.client();

        let first = client
            .register(TicketMessage::registration(&TravelerProfile::adult(1)))
            .await
            .unwrap()
            .unwrap();
        assert!(first.into_reply().await.unwrap().grants(TravelerId(1)));

        let second = client
            .register(TicketMessage::registration(&TravelerProfile::adult(2)))
            .await
            .unwrap()
            .unwrap();
        assert!(!second.into_reply().await.unwrap().authorized);

        let third = client
            .register(TicketMessage::registration(&TravelerProfile::adult(3).with_priority()))
            .await
            .unwrap();
        assert!(third.is_none());

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let registered: Vec<_> = mock.registrations().iter().map(|m| m.traveler_id).collect();
        assert_eq!(registered, vec![TravelerId(1), TravelerId(2), TravelerId(3)]);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected registrations")]
    async fn verify_reports_surprises() {
        let mock = MockTicketOffice::new();
        let client = mock.client();
        client
            .register(TicketMessage::registration(&TravelerProfile::adult(7)))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        mock.verify();
    }
}
