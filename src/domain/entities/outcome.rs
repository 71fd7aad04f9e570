/// Resultado terminal del procesamiento de una entrada. Solo se agrega al
/// recuento final; ninguna entrada lo conserva.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// La entrada se movió a su destino original
    Restored,
    /// El destino ya existía y no se sobrescribió; cuenta como éxito
    AlreadyPresent,
    /// Fallo definitivo, con el último estado HTTP observado si lo hubo
    Failed(Option<u16>),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Restored | Outcome::AlreadyPresent)
    }
}
