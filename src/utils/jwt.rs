use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

// Lo que viaja DENTRO del token firmado
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // id del usuario
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

// Vigencia de la sesión del panel
const TOKEN_DAYS: i64 = 20;

pub fn create_token(
    secret: &str,
    user_id: i32,
    role: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(TOKEN_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifica firma y expiración; devuelve los claims si el token es legítimo.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_token_se_firma_y_se_decodifica() {
        let token = create_token("secreto", 7, "admin").unwrap();
        let claims = decode_token("secreto", &token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn otro_secreto_no_valida() {
        let token = create_token("secreto", 7, "admin").unwrap();
        assert!(decode_token("otro", &token).is_err());
    }

    #[test]
    fn un_token_manipulado_no_valida() {
        let mut token = create_token("secreto", 7, "admin").unwrap();
        token.push('x');
        assert!(decode_token("secreto", &token).is_err());
    }
}
