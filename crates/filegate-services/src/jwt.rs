//! HS256 JWT access tickets.
//!
//! Claims: `sub` (user), `res` (resource identifier), `aud` (viewing or
//! download), `iat`, `exp`. The transport side calls [`JwtTicketIssuer::verify`]
//! with the resource it is about to serve.

use crate::ticket::{TicketIssuer, TicketRequest};
use async_trait::async_trait;
use chrono::Utc;
use filegate_core::{AccessTicket, Audience, FileError, FileResult};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TicketClaims {
    sub: String,
    res: String,
    aud: Audience,
    iat: i64,
    exp: i64,
}

/// Reference issuer and verifier backed by a shared secret
#[derive(Clone)]
pub struct JwtTicketIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl: Duration,
}

impl std::fmt::Debug for JwtTicketIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTicketIssuer")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl JwtTicketIssuer {
    pub fn new(secret: &str, default_ttl: Duration) -> FileResult<Self> {
        if secret.is_empty() {
            return Err(FileError::Configuration(
                "Ticket secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            default_ttl,
        })
    }

    fn encode_claims(&self, claims: &TicketClaims) -> FileResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| FileError::Ticket(format!("Failed to sign ticket: {}", e)))
    }

    /// Verify a ticket for `resource_identifier` and `audience`.
    ///
    /// Fails on a bad signature, expiry, a different audience or a different
    /// resource.
    pub fn verify(
        &self,
        token: &str,
        resource_identifier: &str,
        audience: Audience,
    ) -> FileResult<AccessTicket> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "sub"]);
        validation.leeway = 0;

        let claims = decode::<TicketClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => FileError::Ticket("Ticket has expired".to_string()),
                ErrorKind::InvalidAudience => {
                    FileError::Ticket("Ticket was issued for another audience".to_string())
                }
                _ => FileError::Ticket(format!("Invalid ticket: {}", e)),
            })?;

        if claims.res != resource_identifier {
            return Err(FileError::Ticket(
                "Ticket was issued for another resource".to_string(),
            ));
        }

        Ok(AccessTicket {
            subject_user_id: claims.sub,
            resource_identifier: claims.res,
            audience: claims.aud,
            expires_at: claims.exp,
        })
    }
}

#[async_trait]
impl TicketIssuer for JwtTicketIssuer {
    async fn issue(&self, request: TicketRequest) -> FileResult<String> {
        let ttl = request.options.expires_in.unwrap_or(self.default_ttl);
        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| FileError::Ticket("Ticket lifetime is too large".to_string()))?;
        let now = Utc::now().timestamp();

        let claims = TicketClaims {
            sub: request.subject_user_id,
            res: request.resource_identifier,
            aud: request.audience,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        };

        self.encode_claims(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TicketOptions;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn issuer() -> JwtTicketIssuer {
        JwtTicketIssuer::new(SECRET, Duration::from_secs(300)).unwrap()
    }

    fn request(audience: Audience) -> TicketRequest {
        TicketRequest {
            subject_user_id: "user-1".to_string(),
            resource_identifier: "file/APPLICATION/BANNER/12".to_string(),
            audience,
            options: TicketOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let issuer = issuer();
        let token = issuer.issue(request(Audience::Viewing)).await.unwrap();

        let ticket = issuer
            .verify(&token, "file/APPLICATION/BANNER/12", Audience::Viewing)
            .unwrap();
        assert_eq!(ticket.subject_user_id, "user-1");
        assert_eq!(ticket.audience, Audience::Viewing);
        assert!(ticket.expires_at > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_audience_is_enforced() {
        let issuer = issuer();
        let token = issuer.issue(request(Audience::Viewing)).await.unwrap();

        let result = issuer.verify(&token, "file/APPLICATION/BANNER/12", Audience::Download);
        assert!(matches!(result, Err(FileError::Ticket(_))));
    }

    #[tokio::test]
    async fn test_resource_is_enforced() {
        let issuer = issuer();
        let token = issuer.issue(request(Audience::Download)).await.unwrap();

        let result = issuer.verify(&token, "file/APPLICATION/BANNER/13", Audience::Download);
        assert!(matches!(result, Err(FileError::Ticket(_))));
    }

    #[test]
    fn test_expired_ticket_rejected() {
        let issuer = issuer();
        let now = Utc::now().timestamp();
        let token = issuer
            .encode_claims(&TicketClaims {
                sub: "user-1".to_string(),
                res: "file/USER/AVATAR/1".to_string(),
                aud: Audience::Viewing,
                iat: now - 600,
                exp: now - 300,
            })
            .unwrap();

        let err = issuer
            .verify(&token, "file/USER/AVATAR/1", Audience::Viewing)
            .unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[tokio::test]
    async fn test_other_secret_rejected() {
        let token = issuer().issue(request(Audience::Viewing)).await.unwrap();
        let other =
            JwtTicketIssuer::new("another-secret-another-secret-xx", Duration::from_secs(300))
                .unwrap();

        let result = other.verify(&token, "file/APPLICATION/BANNER/12", Audience::Viewing);
        assert!(matches!(result, Err(FileError::Ticket(_))));
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = JwtTicketIssuer::new("", Duration::from_secs(60));
        assert!(matches!(result, Err(FileError::Configuration(_))));
    }
}
