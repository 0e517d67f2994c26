// src/math/pool.rs
// Wiederverwendbare Scratch-Puffer, um Allokationen pro Update zu vermeiden.

use bevy::log::debug;
use std::collections::HashMap;

/// Pool von `Vec<T>`-Puffern, gruppiert nach Zweierpotenz-Kapazität.
///
/// `acquire` liefert einen leeren Vektor mit mindestens der angeforderten
/// Kapazität, `release` gibt ihn zur Wiederverwendung zurück.
#[derive(Debug)]
pub struct ScratchPool<T> {
    buckets: HashMap<usize, Vec<Vec<T>>>,
    hit_count: usize,
    miss_count: usize,
}

impl<T> Default for ScratchPool<T> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            hit_count: 0,
            miss_count: 0,
        }
    }
}

impl<T> ScratchPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn bucket_for(capacity: usize) -> usize {
        capacity.max(1).next_power_of_two()
    }

    /// Holt einen leeren Puffer mit Kapazität >= `min_len`.
    pub fn acquire(&mut self, min_len: usize) -> Vec<T> {
        let bucket = Self::bucket_for(min_len);
        if let Some(mut buffer) = self.buckets.get_mut(&bucket).and_then(Vec::pop) {
            self.hit_count += 1;
            buffer.clear();
            return buffer;
        }
        self.miss_count += 1;
        debug!("ScratchPool miss: allocating bucket of {} elements", bucket);
        Vec::with_capacity(bucket)
    }

    /// Gibt einen Puffer an den Pool zurück. Puffer ohne Kapazität werden verworfen.
    pub fn release(&mut self, mut buffer: Vec<T>) {
        let capacity = buffer.capacity();
        if capacity == 0 {
            return;
        }
        // Abrunden, damit jeder Puffer im Bucket die volle Bucket-Größe garantiert
        let bucket = if capacity.is_power_of_two() {
            capacity
        } else {
            capacity.next_power_of_two() / 2
        };
        buffer.clear();
        self.buckets.entry(bucket).or_default().push(buffer);
    }

    /// Anzahl der aus dem Pool bedienten Anforderungen.
    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    /// Anzahl der Anforderungen, die eine neue Allokation benötigten.
    pub fn miss_count(&self) -> usize {
        self.miss_count
    }

    /// Anzahl der aktuell freien Puffer.
    pub fn available(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
