//! Client side of register and login.
//!
//! The flows run over any [`Connection`]; [`Client`] wraps them with a TCP
//! connect and password-derived secrets for the command line.

use std::time::Duration;

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::auth::AuthProver;
use crate::network::proto::{
    auth_request, register_request, AnswerRequest, AuthRequest, AuthResponse, ChallengeResponse,
    RegisterRequest, RegisterResponse,
};
use crate::network::{Connection, Message, NamedMessage};
use crate::{
    derive_secret, uint_from_wire, uint_to_wire, Error, GroupParameters, Result, SecureRng,
};

/// The server's answer to a register or login attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerVerdict {
    /// Whether the server accepted the request.
    pub accepted: bool,
    /// Error text reported by the server, if any.
    ///
    /// A failed proof is reported without a reason.
    pub reason: Option<String>,
}

impl ServerVerdict {
    fn new(accepted: bool, error: String) -> Self {
        Self {
            accepted,
            reason: (!error.is_empty()).then_some(error),
        }
    }
}

/// Registers `user` with the record derived from `secret`.
pub async fn register<S>(
    connection: &mut Connection<S>,
    params: &GroupParameters,
    user: &str,
    secret: &BigUint,
) -> Result<ServerVerdict>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let record = AuthProver::new(params.clone(), secret.clone()).create_register_commits();
    debug!(user, record = %record, "sending registration");

    connection
        .send(RegisterRequest {
            user: user.to_string(),
            commits: vec![register_request::Commits {
                y1: uint_to_wire(record.c1()),
                y2: uint_to_wire(record.c2()),
            }],
        })
        .await?;

    match connection.recv().await? {
        Message::RegisterResponse(response) => Ok(ServerVerdict::new(response.result, response.error)),
        other => Err(Error::WrongResponse {
            expected: RegisterResponse::NAME,
            actual: other.type_name().to_string(),
        }),
    }
}

/// Proves knowledge of `secret` for `user`.
///
/// The server either challenges the commitment or, for unknown users,
/// answers right away with a negative verdict.
pub async fn login<S, R>(
    connection: &mut Connection<S>,
    params: &GroupParameters,
    user: &str,
    secret: &BigUint,
    rng: &mut R,
) -> Result<ServerVerdict>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: RngCore + CryptoRng,
{
    let mut prover = AuthProver::new(params.clone(), secret.clone());
    let commitment = prover.create_authentication_commits(rng)?;
    debug!(user, commitment = %commitment, "sending login");

    connection
        .send(AuthRequest {
            user: user.to_string(),
            commits: vec![auth_request::Commits {
                r1: uint_to_wire(commitment.c1()),
                r2: uint_to_wire(commitment.c2()),
            }],
        })
        .await?;

    let challenge = match connection.recv().await? {
        Message::ChallengeResponse(challenge) => uint_from_wire(&challenge.challenge),
        Message::AuthResponse(response) => {
            return Ok(ServerVerdict::new(response.result, response.error))
        }
        other => {
            return Err(Error::WrongResponse {
                expected: ChallengeResponse::NAME,
                actual: other.type_name().to_string(),
            })
        }
    };

    let answer = prover.prove_authentication(&challenge)?;
    connection
        .send(AnswerRequest {
            answer: uint_to_wire(&answer),
        })
        .await?;

    match connection.recv().await? {
        Message::AuthResponse(response) => Ok(ServerVerdict::new(response.result, response.error)),
        other => Err(Error::WrongResponse {
            expected: AuthResponse::NAME,
            actual: other.type_name().to_string(),
        }),
    }
}

/// TCP client deriving secrets from passwords.
#[derive(Clone, Debug)]
pub struct Client {
    server: String,
    params: GroupParameters,
    read_timeout: Option<Duration>,
}

impl Client {
    /// Creates a client for `server` (`host:port`) over the RFC 5114 group.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            params: GroupParameters::rfc5114().clone(),
            read_timeout: None,
        }
    }

    /// Replaces the group parameters.
    pub fn with_params(mut self, params: GroupParameters) -> Self {
        self.params = params;
        self
    }

    /// Sets a timeout for each server reply.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Registers `user` with a secret derived from `password`.
    pub async fn register(&self, user: &str, password: &str) -> Result<ServerVerdict> {
        let secret = self.secret(user, password).await?;
        let mut connection = self.connect().await?;
        let verdict = register(&mut connection, &self.params, user, &secret).await?;
        info!(user, accepted = verdict.accepted, "registration finished");
        Ok(verdict)
    }

    /// Logs `user` in with a secret derived from `password`.
    pub async fn login(&self, user: &str, password: &str) -> Result<ServerVerdict> {
        let secret = self.secret(user, password).await?;
        let mut connection = self.connect().await?;
        let verdict = login(&mut connection, &self.params, user, &secret, &mut SecureRng::new()).await?;
        info!(user, accepted = verdict.accepted, "login finished");
        Ok(verdict)
    }

    /// Runs the password derivation off the async workers.
    async fn secret(&self, user: &str, password: &str) -> Result<BigUint> {
        let q = self.params.order().clone();
        let user = user.to_string();
        let password = Zeroizing::new(password.to_string());
        tokio::task::spawn_blocking(move || derive_secret(&q, &user, &password))
            .await
            .map_err(|e| Error::KeyDerivation(format!("derivation task failed: {e}")))?
    }

    async fn connect(&self) -> Result<Connection<TcpStream>> {
        debug!(server = %self.server, "connecting");
        let stream = TcpStream::connect(&self.server).await?;
        Ok(Connection::new(stream).with_read_timeout(self.read_timeout))
    }
}
