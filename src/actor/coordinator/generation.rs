/// Tag carried by deferred work; the work only runs if it is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Marker(u64);

impl Marker {
    pub fn get(&self) -> u64 { self.0 }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { self.0.fmt(f) }
}

/// Counter advanced by every event that invalidates in-flight reconfiguration.
#[derive(Debug, Default)]
pub struct Generation(Marker);

impl Generation {
    pub fn new() -> Self { Self::default() }

    pub fn current(&self) -> Marker { self.0 }

    /// Starts a new generation, superseding everything tagged before it.
    pub fn next(&mut self) -> Marker {
        self.0 = Marker(self.0.0.wrapping_add(1));
        self.0
    }

    pub fn is_current(&self, marker: Marker) -> bool { self.0 == marker }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_supersedes_previous_markers() {
        let mut generation = Generation::new();
        let first = generation.next();
        assert!(generation.is_current(first));

        let second = generation.next();
        assert_ne!(first, second);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_eq!(generation.current(), second);
    }

    #[test]
    fn wraps_around() {
        let mut generation = Generation(Marker(u64::MAX));
        assert_eq!(generation.next().get(), 0);
    }
}
