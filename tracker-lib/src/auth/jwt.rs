use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde::Serialize;
use std::time::UNIX_EPOCH;
use tracker_repo::user_repo::UserId;

#[derive(Clone)]
pub struct JWTAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    exp: usize,
    sub: UserId,
}

/// Why a presented token was not accepted. The kinds are logged separately
/// but all collapse to the same generic response at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Malformed,
    BadSignature,
    Expired,
}

impl JWTAuth {
    const EXPIRE_TIME: u64 = 60 * 60;

    pub fn from_secret(secret: Vec<u8>) -> JWTAuth {
        JWTAuth {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
        }
    }

    pub fn create_token(&self, user_id: UserId) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            exp: Self::generate_exp(),
            sub: user_id,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> Result<UserId, TokenRejection> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            }),
        }
    }

    fn generate_exp() -> usize {
        (std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the unix epoch")
            .as_secs()
            + Self::EXPIRE_TIME) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{Claims, JWTAuth, TokenRejection};
    use base64::Engine;
    use jsonwebtoken::{EncodingKey, Header};
    use std::time::UNIX_EPOCH;

    fn jwt_auth_with_secret() -> (JWTAuth, Vec<u8>) {
        let secret: [u8; 32] = rand::random();
        (JWTAuth::from_secret(secret.to_vec()), secret.to_vec())
    }

    #[test]
    fn valid_token() {
        let (jwt_auth, _) = jwt_auth_with_secret();

        let token = jwt_auth.create_token(42).unwrap();
        assert_eq!(jwt_auth.validate_token(&token), Ok(42));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let (jwt_auth, _) = jwt_auth_with_secret();

        let token_bytes: [u8; 32] = rand::random();
        let base64_engine = base64::engine::general_purpose::STANDARD;
        let token = base64_engine.encode(token_bytes);
        assert_eq!(
            jwt_auth.validate_token(&token),
            Err(TokenRejection::Malformed)
        );
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let (jwt_auth, _) = jwt_auth_with_secret();
        let (other_auth, _) = jwt_auth_with_secret();

        let token = other_auth.create_token(42).unwrap();
        assert_eq!(
            jwt_auth.validate_token(&token),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let (jwt_auth, secret) = jwt_auth_with_secret();

        let now = std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        // two hours in the past, well outside the default validation leeway
        let claims = Claims {
            exp: (now - 2 * 60 * 60) as usize,
            sub: 42,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&secret),
        )
        .unwrap();
        assert_eq!(
            jwt_auth.validate_token(&token),
            Err(TokenRejection::Expired)
        );
    }
}
