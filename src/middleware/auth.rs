//! Autenticación JWT
//!
//! El proveedor de identidad es externo: aquí solo se verifican los tokens
//! que emite y se extrae el id del caller. El extractor inyecta la identidad
//! como parámetro explícito de cada handler, nunca como estado ambiental.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
    pub iat: usize,
}

/// Usuario autenticado extraído del Bearer token
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized("Token de autorización requerido".to_string())
            })?;

        let claims = verify_token(token, &state.config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Verificar y decodificar un JWT
pub fn verify_token(token: &str, config: &EnvironmentConfig) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Generar un JWT para un usuario. En producción los emite el proveedor de
/// identidad con el mismo secreto; esto queda para tests y tooling.
pub fn generate_token(user_id: Uuid, config: &EnvironmentConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EnvironmentConfig {
        EnvironmentConfig {
            environment: "test".to_string(),
            port: 0,
            host: "localhost".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec![],
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = generate_token(user_id, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let token = generate_token(Uuid::new_v4(), &config).unwrap();

        let other = EnvironmentConfig {
            jwt_secret: "otro-secreto".to_string(),
            ..test_config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        assert!(verify_token("no-es-un-jwt", &config).is_err());
    }
}
