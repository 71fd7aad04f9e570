use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::common::errors::{Result, RestoreError};

/// Configuración de reintentos para MOVE / MKCOL
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Número máximo de intentos por operación
    pub max_attempts: u32,
    /// Retardo base entre intentos (ms); el retardo crece linealmente con el intento
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 300, // 300ms, 600ms, 900ms...
        }
    }
}

impl RetryConfig {
    /// Obtiene el retardo base como Duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Configuración del cliente HTTP
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Timeout por petición (segundos)
    pub timeout_secs: u64,
    /// Verificación del certificado TLS del servidor
    pub verify_tls: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            verify_tls: true,
        }
    }
}

impl HttpConfig {
    /// Obtiene el timeout de peticiones como Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Identidad y credenciales del servidor remoto
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// URL base del servidor (ej: https://cloud.example.org)
    pub base_url: String,
    /// Cuenta cuya papelera se restaura
    pub username: String,
    /// Credencial adjunta a cada petición
    pub password: String,
}

/// Configuración global de la aplicación
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Servidor y credenciales
    pub server: ServerConfig,
    /// Las entradas borradas estrictamente antes de este instante se excluyen
    pub cutoff: DateTime<Utc>,
    /// Shard asignado a este proceso
    pub shard: u32,
    /// Número total de shards acordado entre procesos
    pub total_shards: u32,
    /// Sub-rango posicional del plan post-shard (inicio)
    pub range_from: usize,
    /// Sub-rango posicional del plan post-shard (fin inclusivo)
    pub range_to: Option<usize>,
    /// Restringe el catálogo a destinos con este prefijo
    pub prefix: Option<String>,
    /// Política de reintentos
    pub retry: RetryConfig,
    /// Cliente HTTP
    pub http: HttpConfig,
}

/// Parsea el instante de corte: RFC 3339 completo, fecha-hora sin zona, o solo fecha
/// (medianoche UTC).
pub fn parse_cutoff(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(start_of_day) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&start_of_day));
        }
    }
    Err(RestoreError::invalid_input(
        "Config",
        format!("unrecognized cutoff date: {raw}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn cutoff_accepts_date_only_as_utc_midnight() {
        let cutoff = parse_cutoff("2025-06-01").unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn cutoff_accepts_rfc3339() {
        let cutoff = parse_cutoff("2025-06-01T12:30:00+02:00").unwrap();
        assert_eq!(cutoff.hour(), 10); // normalizado a UTC
    }

    #[test]
    fn cutoff_accepts_naive_datetime() {
        let cutoff = parse_cutoff("2025-06-01T12:30:00").unwrap();
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn cutoff_rejects_garbage() {
        assert!(parse_cutoff("last tuesday").is_err());
    }

    #[test]
    fn retry_defaults_match_reference_policy() {
        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 4);
        assert_eq!(retry.base_delay(), Duration::from_millis(300));
    }
}
