use serde::Serialize;

/// Recuento final de una ejecución. Restaurados y ya-presentes cuentan como OK.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub restored: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn ok(&self) -> usize {
        self.restored + self.already_present
    }
}
