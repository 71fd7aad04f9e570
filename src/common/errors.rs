use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Tipos de errores comunes en toda la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// La consulta de metadatos de la papelera falló
    Discovery,
    /// Respuesta multistatus estructuralmente inválida
    Parse,
    /// Fallo a nivel de red (conexión, timeout, TLS)
    Transport,
    /// No se pudo crear un directorio destino
    Materialization,
    /// Entrada inválida o validación fallida
    InvalidInput,
    /// Error interno del sistema
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ErrorKind::Discovery => write!(f, "Discovery"),
            ErrorKind::Parse => write!(f, "Parse"),
            ErrorKind::Transport => write!(f, "Transport"),
            ErrorKind::Materialization => write!(f, "Materialization"),
            ErrorKind::InvalidInput => write!(f, "Invalid Input"),
            ErrorKind::Internal => write!(f, "Internal Error"),
        }
    }
}

/// Error base de la aplicación con contexto de la operación afectada
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct RestoreError {
    /// Tipo de error
    pub kind: ErrorKind,
    /// Operación afectada (ej: "Propfind", "Mkcol", "Move")
    pub operation: &'static str,
    /// Mensaje descriptivo del error
    pub message: String,
    /// Error fuente (opcional)
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl RestoreError {
    /// Crea un nuevo error de aplicación
    pub fn new<S: Into<String>>(kind: ErrorKind, operation: &'static str, message: S) -> Self {
        Self {
            kind,
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Fallo de la fase de descubrimiento (catálogo completo)
    pub fn discovery<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Discovery, operation, message)
    }

    /// Respuesta del servidor que no se pudo interpretar
    pub fn parse<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Parse, operation, message)
    }

    /// Fallo de red durante cualquier operación
    pub fn transport<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Transport, operation, message)
    }

    /// Fallo creando directorios destino (local a una entrada)
    pub fn materialization<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Materialization, operation, message)
    }

    /// Crea un error de validación
    pub fn invalid_input<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::new(ErrorKind::InvalidInput, operation, message)
    }

    /// Crea un error interno
    pub fn internal<S: Into<String>>(operation: &'static str, message: S) -> Self {
        Self::new(ErrorKind::Internal, operation, message)
    }

    /// Establece el error fuente
    pub fn with_source<E: StdError + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Un error de catálogo aborta la ejecución completa; el resto es local a una entrada
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::Discovery | ErrorKind::Parse)
    }
}

pub type Result<T> = std::result::Result<T, RestoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_and_parse_are_fatal() {
        assert!(RestoreError::discovery("Propfind", "HTTP 500").is_fatal());
        assert!(RestoreError::parse("Multistatus", "not XML").is_fatal());
        assert!(!RestoreError::transport("Move", "connection refused").is_fatal());
        assert!(!RestoreError::materialization("Mkcol", "HTTP 403").is_fatal());
    }

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = RestoreError::discovery("Propfind", "HTTP 500");
        assert_eq!(err.to_string(), "Discovery: HTTP 500");
    }
}
