// src/math/scalar_field.rs

/// Trait für ein zweidimensionales Skalarfeld.
/// Ermöglicht es Algorithmen wie der Iso-Linien-Extraktion oder der
/// Gradientenberechnung, auf verschiedenen Feldimplementierungen zu operieren.
pub trait ScalarField2D {
    /// Gibt die Anzahl der Spalten zurück.
    fn width(&self) -> usize;

    /// Gibt die Anzahl der Zeilen zurück.
    fn height(&self) -> usize;

    /// Gibt den Skalarwert an (Zeile, Spalte) zurück.
    /// Nicht endliche Werte (NaN, ±∞) markieren Löcher und werden unverändert geliefert.
    fn get_value(&self, row: usize, col: usize) -> f32;

    /// Prüft, ob das Feld mindestens eine Zelle (2×2 Samples) besitzt.
    fn has_cells(&self) -> bool {
        self.width() > 1 && self.height() > 1
    }
}
