// File: src/ui/components/selection.rs

/// Selezione multipla ordinata di valori
///
/// La selezione non viene mai modificata sul posto dai componenti: `toggled`
/// restituisce una nuova selezione da propagare al proprietario.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelection<T> {
    /// Valori selezionati, nell'ordine di selezione
    values: Vec<T>,
}

impl<T: Clone + PartialEq> MultiSelection<T> {
    /// Crea una selezione vuota
    pub fn new() -> Self {
        MultiSelection { values: Vec::new() }
    }

    /// Crea una selezione a partire da valori esistenti, scartando i duplicati
    pub fn from_values(values: &[T]) -> Self {
        let mut selection = MultiSelection::new();
        for value in values {
            if !selection.is_selected(value) {
                selection.values.push(value.clone());
            }
        }
        selection
    }

    /// Restituisce la selezione con il valore aggiunto o rimosso
    pub fn toggled(&self, value: &T) -> Self {
        let mut values = self.values.clone();
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.clone());
        }
        MultiSelection { values }
    }

    /// Verifica se un valore è selezionato
    pub fn is_selected(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    /// Conta quanti valori sono selezionati
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

impl<T: Clone + PartialEq> Default for MultiSelection<T> {
    fn default() -> Self {
        MultiSelection::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_returns_new_selection() {
        let selection = MultiSelection::from_values(&[1, 2]);
        let next = selection.toggled(&3);

        assert_eq!(selection.values(), &[1, 2]);
        assert_eq!(next.values(), &[1, 2, 3]);
        assert_eq!(next.toggled(&1).values(), &[2, 3]);
    }

    #[test]
    fn duplicates_are_dropped() {
        let selection = MultiSelection::from_values(&[5, 5, 7]);
        assert_eq!(selection.count(), 2);
        assert!(selection.is_selected(&7));
        assert!(!selection.is_selected(&1));
    }
}
