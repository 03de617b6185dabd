// src/math/scalar_field.rs

/// Trait für ein zweidimensionales Skalarfeld auf einem Breiten-/Längen-Gitter.
/// Ermöglicht es nachgelagerten Konturierungs- und Rasterwerkzeugen, auf
/// verschiedenen Feldimplementierungen zu operieren.
pub trait ScalarField2D {
    /// Anzahl der Spalten (Längengrade).
    fn width(&self) -> usize;

    /// Anzahl der Zeilen (Breitengrade).
    fn height(&self) -> usize;

    /// Skalarwert an Spalte `x_idx`, Zeile `y_idx`.
    /// `None` außerhalb der Grenzen oder für fehlende Zellen.
    fn value_at(&self, x_idx: usize, y_idx: usize) -> Option<f64>;

    /// Gitterkoordinate (Breite, Länge) in Grad einer Zelle.
    fn cell_to_world(&self, x_idx: usize, y_idx: usize) -> Option<(f64, f64)>;

    /// Kleinster und größter vorhandener Wert, z. B. für Konturstufen.
    fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for y in 0..self.height() {
            for x in 0..self.width() {
                if let Some(v) = self.value_at(x, y) {
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
            }
        }
        range
    }
}
