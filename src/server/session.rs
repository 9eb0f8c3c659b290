//! Per-connection protocol state machine.
//!
//! ```text
//! AwaitingRequest --RegisterRequest--> Registration --> Closed
//!                 --AuthRequest------> Login --ChallengeResponse/AnswerRequest--> Closed
//! ```
//!
//! A session serves exactly one request. Business failures (duplicate user,
//! unknown user, failed proof) are answered and close the session normally;
//! protocol violations end it with an error and no response.

use std::fmt;

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use super::registry::Registry;
use crate::auth::verify_authentication;
use crate::network::proto::{
    AnswerRequest, AuthRequest, AuthResponse, ChallengeResponse, RegisterRequest, RegisterResponse,
};
use crate::network::{Connection, Message, NamedMessage};
use crate::protocol::random_challenge;
use crate::{uint_from_wire, uint_to_wire, Commitment, Error, GroupParameters, Result};

/// Longest accepted user id, in bytes.
pub const MAX_USER_ID_LEN: usize = 256;

/// How a session ended when no protocol error occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A new user was stored.
    Registered { user: String },
    /// Registration was refused and the reason reported to the client.
    RegistrationRejected { user: String, reason: String },
    /// The proof verified.
    Authenticated { user: String },
    /// The proof did not verify.
    AuthenticationFailed { user: String },
    /// Login for a user id that was never registered.
    UnknownUser { user: String },
}

impl SessionOutcome {
    /// User id the session was about.
    pub fn user(&self) -> &str {
        match self {
            SessionOutcome::Registered { user }
            | SessionOutcome::RegistrationRejected { user, .. }
            | SessionOutcome::Authenticated { user }
            | SessionOutcome::AuthenticationFailed { user }
            | SessionOutcome::UnknownUser { user } => user,
        }
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Registered { user } => write!(f, "registered {user:?}"),
            SessionOutcome::RegistrationRejected { user, reason } => {
                write!(f, "rejected registration of {user:?}: {reason}")
            }
            SessionOutcome::Authenticated { user } => write!(f, "authenticated {user:?}"),
            SessionOutcome::AuthenticationFailed { user } => {
                write!(f, "authentication of {user:?} failed")
            }
            SessionOutcome::UnknownUser { user } => write!(f, "login for unknown user {user:?}"),
        }
    }
}

/// Server side of one connection.
pub struct Session<'a, S, G: ?Sized, R> {
    connection: Connection<S>,
    registry: &'a G,
    params: &'a GroupParameters,
    rng: R,
    pending_challenge: Option<BigUint>,
}

impl<'a, S, G, R> Session<'a, S, G, R>
where
    S: AsyncRead + AsyncWrite + Unpin,
    G: Registry + ?Sized,
    R: RngCore + CryptoRng,
{
    /// Creates a session in the `AwaitingRequest` state.
    pub fn new(
        connection: Connection<S>,
        registry: &'a G,
        params: &'a GroupParameters,
        rng: R,
    ) -> Self {
        Self {
            connection,
            registry,
            params,
            rng,
            pending_challenge: None,
        }
    }

    /// Serves the single request of this connection.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownRequest`] if the first message is not a request
    /// - [`Error::MalformedRequest`] for empty commitments, bad user ids,
    ///   unreduced commitments or an answer outside `[0, q)`
    /// - [`Error::WrongResponse`] if anything but an answer follows the challenge
    /// - transport, framing and randomness errors
    pub async fn run(mut self) -> Result<SessionOutcome> {
        let request = match self.connection.recv().await {
            Ok(message) => message,
            Err(Error::UnknownMessageType(name)) => return Err(Error::UnknownRequest(name)),
            Err(e) => return Err(e),
        };

        match request {
            Message::RegisterRequest(request) => self.register(request).await,
            Message::AuthRequest(request) => self.login(request).await,
            other => Err(Error::UnknownRequest(other.type_name().to_string())),
        }
    }

    async fn register(&mut self, request: RegisterRequest) -> Result<SessionOutcome> {
        validate_user_id(&request.user)?;
        let commits = request.commits.first().ok_or_else(|| {
            Error::MalformedRequest("registration carries no commitments".to_string())
        })?;
        let record = Commitment::new(uint_from_wire(&commits.y1), uint_from_wire(&commits.y2));
        record.validate(self.params)?;
        debug!(user = %request.user, record = %record, "registration request");

        let user = request.user;
        match self.registry.add(&user, record).await {
            Ok(()) => {
                self.connection
                    .send(RegisterResponse {
                        result: true,
                        error: String::new(),
                    })
                    .await?;
                info!(user = %user, "registered new user");
                Ok(SessionOutcome::Registered { user })
            }
            Err(e) if e.is_recoverable() => {
                let reason = e.to_string();
                self.connection
                    .send(RegisterResponse {
                        result: false,
                        error: reason.clone(),
                    })
                    .await?;
                Ok(SessionOutcome::RegistrationRejected { user, reason })
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&mut self, request: AuthRequest) -> Result<SessionOutcome> {
        validate_user_id(&request.user)?;
        let commits = request
            .commits
            .first()
            .ok_or_else(|| Error::MalformedRequest("login carries no commitments".to_string()))?;
        let session = Commitment::new(uint_from_wire(&commits.r1), uint_from_wire(&commits.r2));
        session.validate(self.params)?;
        debug!(user = %request.user, commitment = %session, "login request");

        let user = request.user;
        let registered = match self.registry.get(&user).await {
            Ok(registered) => registered,
            Err(e) if e.is_recoverable() => {
                self.connection
                    .send(AuthResponse {
                        result: false,
                        error: e.to_string(),
                    })
                    .await?;
                return Ok(SessionOutcome::UnknownUser { user });
            }
            Err(e) => return Err(e),
        };

        let challenge = random_challenge(self.params, &mut self.rng)?;
        debug!(user = %user, challenge = %hex::encode(challenge.to_bytes_be()), "issuing challenge");
        self.connection
            .send(ChallengeResponse {
                challenge: uint_to_wire(&challenge),
            })
            .await?;
        self.pending_challenge = Some(challenge);

        let answer = self.await_answer().await?;
        let result = self.pending_challenge.take().is_some_and(|challenge| {
            verify_authentication(self.params, &registered, &session, &challenge, &answer)
        });

        self.connection
            .send(AuthResponse {
                result,
                error: String::new(),
            })
            .await?;

        if result {
            info!(user = %user, "user authenticated");
            Ok(SessionOutcome::Authenticated { user })
        } else {
            info!(user = %user, "authentication failed");
            Ok(SessionOutcome::AuthenticationFailed { user })
        }
    }

    /// Reads the answer to the pending challenge.
    ///
    /// Any other envelope, including one of an unknown type, is a wrong
    /// response. Answers outside `[0, q)` are rejected before any
    /// exponentiation.
    async fn await_answer(&mut self) -> Result<BigUint> {
        let answer = match self.connection.recv().await {
            Ok(Message::AnswerRequest(answer)) => uint_from_wire(&answer.answer),
            Ok(other) => {
                return Err(Error::WrongResponse {
                    expected: AnswerRequest::NAME,
                    actual: other.type_name().to_string(),
                })
            }
            Err(Error::UnknownMessageType(name)) => {
                return Err(Error::WrongResponse {
                    expected: AnswerRequest::NAME,
                    actual: name,
                })
            }
            Err(e) => return Err(e),
        };

        if &answer >= self.params.order() {
            return Err(Error::MalformedRequest(
                "answer is not reduced modulo q".to_string(),
            ));
        }
        Ok(answer)
    }
}

/// Checks that a user id is non-empty and at most [`MAX_USER_ID_LEN`] bytes.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(Error::MalformedRequest("user id cannot be empty".to_string()));
    }

    if user_id.len() > MAX_USER_ID_LEN {
        return Err(Error::MalformedRequest("user id too long".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::proto::{auth_request, register_request};
    use crate::network::{write_frame, Envelope};
    use crate::server::InMemoryRegistry;
    use crate::SecureRng;

    fn small() -> GroupParameters {
        GroupParameters::new(
            BigUint::from(23u32),
            BigUint::from(11u32),
            BigUint::from(4u32),
            BigUint::from(9u32),
        )
        .unwrap()
    }

    async fn run_session(
        registry: &InMemoryRegistry,
        params: &GroupParameters,
        messages: Vec<Message>,
    ) -> (Result<SessionOutcome>, Vec<Message>) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let mut client = Connection::new(client);
        for message in messages {
            client.send(message).await.unwrap();
        }

        let outcome = Session::new(Connection::new(server), registry, params, SecureRng::new())
            .run()
            .await;

        let mut replies = Vec::new();
        while let Ok(message) = client.recv().await {
            replies.push(message);
        }
        (outcome, replies)
    }

    fn register(user: &str, y1: u8, y2: u8) -> Message {
        RegisterRequest {
            user: user.to_string(),
            commits: vec![register_request::Commits {
                y1: vec![y1],
                y2: vec![y2],
            }],
        }
        .into()
    }

    fn login(user: &str, r1: u8, r2: u8) -> Message {
        AuthRequest {
            user: user.to_string(),
            commits: vec![auth_request::Commits {
                r1: vec![r1],
                r2: vec![r2],
            }],
        }
        .into()
    }

    async fn registry_with_alice() -> InMemoryRegistry {
        let registry = InMemoryRegistry::new();
        registry
            .add(
                "alice",
                Commitment::new(BigUint::from(2u32), BigUint::from(3u32)),
            )
            .await
            .unwrap();
        registry
    }

    #[test]
    fn user_id_validation() {
        assert!(validate_user_id("alice").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id(&"a".repeat(MAX_USER_ID_LEN)).is_ok());
        assert!(validate_user_id(&"a".repeat(MAX_USER_ID_LEN + 1)).is_err());
    }

    #[tokio::test]
    async fn registration_succeeds_once() {
        let registry = InMemoryRegistry::new();
        let params = small();

        let (outcome, replies) = run_session(&registry, &params, vec![register("alice", 2, 3)]).await;
        assert_eq!(
            outcome.unwrap(),
            SessionOutcome::Registered {
                user: "alice".to_string()
            }
        );
        assert_eq!(
            replies,
            vec![Message::RegisterResponse(RegisterResponse {
                result: true,
                error: String::new()
            })]
        );

        let (outcome, replies) =
            run_session(&registry, &params, vec![register("alice", 18, 16)]).await;
        assert!(matches!(outcome, Ok(SessionOutcome::RegistrationRejected { .. })));
        assert_eq!(
            replies,
            vec![Message::RegisterResponse(RegisterResponse {
                result: false,
                error: "user already exists".to_string()
            })]
        );
    }

    #[tokio::test]
    async fn login_for_unknown_user() {
        let registry = InMemoryRegistry::new();
        let (outcome, replies) = run_session(&registry, &small(), vec![login("bob", 8, 4)]).await;
        assert!(matches!(outcome, Ok(SessionOutcome::UnknownUser { .. })));
        assert_eq!(
            replies,
            vec![Message::AuthResponse(AuthResponse {
                result: false,
                error: "user doesn't exist".to_string()
            })]
        );
    }

    #[tokio::test]
    async fn response_type_as_request_is_unknown() {
        let registry = InMemoryRegistry::new();
        let request = Message::from(AuthResponse {
            result: true,
            error: String::new(),
        });
        let (outcome, replies) = run_session(&registry, &small(), vec![request]).await;
        assert!(matches!(outcome, Err(Error::UnknownRequest(name)) if name == "AuthResponse"));
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn empty_commitments_are_malformed() {
        let registry = InMemoryRegistry::new();
        let request = Message::from(RegisterRequest {
            user: "alice".to_string(),
            commits: Vec::new(),
        });
        let (outcome, replies) = run_session(&registry, &small(), vec![request]).await;
        assert!(matches!(outcome, Err(Error::MalformedRequest(_))));
        assert!(replies.is_empty());
        assert_eq!(registry.user_count().await, 0);
    }

    #[tokio::test]
    async fn unreduced_commitment_is_malformed() {
        let registry = InMemoryRegistry::new();
        let (outcome, _) = run_session(&registry, &small(), vec![register("alice", 23, 3)]).await;
        assert!(matches!(outcome, Err(Error::MalformedRequest(_))));
    }

    #[tokio::test]
    async fn non_answer_after_challenge() {
        let registry = InMemoryRegistry::new();
        let params = small();
        registry
            .add(
                "alice",
                Commitment::new(BigUint::from(2u32), BigUint::from(3u32)),
            )
            .await
            .unwrap();

        let (outcome, replies) =
            run_session(&registry, &params, vec![login("alice", 8, 4), login("alice", 8, 4)]).await;
        assert!(matches!(
            outcome,
            Err(Error::WrongResponse {
                expected: "AnswerRequest",
                actual,
            }) if actual == "AuthRequest"
        ));
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].type_name(), "ChallengeResponse");
    }

    #[tokio::test]
    async fn unknown_type_after_challenge_is_wrong_response() {
        let registry = registry_with_alice().await;
        let (mut client, server) = tokio::io::duplex(4096);
        write_frame(&mut client, &login("alice", 8, 4).encode())
            .await
            .unwrap();
        write_frame(&mut client, &Envelope::new("Bogus", vec![1]).encode())
            .await
            .unwrap();

        let outcome = Session::new(Connection::new(server), &registry, &small(), SecureRng::new())
            .run()
            .await;
        assert!(matches!(
            outcome,
            Err(Error::WrongResponse {
                expected: "AnswerRequest",
                actual,
            }) if actual == "Bogus"
        ));
    }

    #[tokio::test]
    async fn unreduced_answer_is_malformed() {
        let registry = registry_with_alice().await;
        let params = small();

        for answer in [vec![11], vec![0xff; 4096]] {
            let (outcome, replies) = run_session(
                &registry,
                &params,
                vec![login("alice", 8, 4), AnswerRequest { answer }.into()],
            )
            .await;
            assert!(matches!(outcome, Err(Error::MalformedRequest(_))));
            assert_eq!(replies.len(), 1);
            assert_eq!(replies[0].type_name(), "ChallengeResponse");
        }
    }

    #[tokio::test]
    async fn reduced_answer_reaches_verification() {
        let registry = registry_with_alice().await;
        let (outcome, replies) = run_session(
            &registry,
            &small(),
            vec![
                login("alice", 8, 4),
                // only answers a zero challenge, which is never issued
                AnswerRequest { answer: vec![7] }.into(),
            ],
        )
        .await;
        assert!(matches!(outcome, Ok(SessionOutcome::AuthenticationFailed { .. })));
        assert_eq!(replies.len(), 2);
    }

    #[test]
    fn outcome_display() {
        let outcome = SessionOutcome::Authenticated {
            user: "alice".to_string(),
        };
        assert_eq!(outcome.user(), "alice");
        assert_eq!(outcome.to_string(), "authenticated \"alice\"");
    }
}
