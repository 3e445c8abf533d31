use crate::config::EngineConfig;
use crate::geometry::BoundingBox;
use crate::scene::MapElement;
use serde::Serialize;

/// Summary of a resolution run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclutterStats {
    pub total_elements: usize,
    pub fixed_elements: usize,
    pub movable_elements: usize,
    pub elements_moved: usize,
    pub move_percentage: f32,
}

/// Priority-driven overlap resolution over a set of map elements.
///
/// The engine owns the element vector; `fixed` and `movable` are index views
/// computed once at construction, each preserving input order. Movable
/// elements that overlap a fixed element are nudged through a fixed ladder of
/// candidate offsets until either every such overlap is gone or the iteration
/// cap is hit. Candidate positions are validated against fixed elements only;
/// two movable elements may still overlap each other afterwards.
pub struct DeclutterEngine {
    elements: Vec<MapElement>,
    fixed: Vec<usize>,
    movable: Vec<usize>,
    offsets: [(f32, f32); 8],
    max_iterations: usize,
}

impl DeclutterEngine {
    pub fn new(elements: Vec<MapElement>, config: &EngineConfig) -> Self {
        let mut fixed = Vec::new();
        let mut movable = Vec::new();
        for (idx, element) in elements.iter().enumerate() {
            if element.movable {
                movable.push(idx);
            } else {
                fixed.push(idx);
            }
        }
        Self {
            elements,
            fixed,
            movable,
            offsets: config.movement_offsets(),
            max_iterations: config.max_iterations,
        }
    }

    pub fn elements(&self) -> &[MapElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<MapElement> {
        self.elements
    }

    pub fn fixed_indices(&self) -> &[usize] {
        &self.fixed
    }

    pub fn movable_indices(&self) -> &[usize] {
        &self.movable
    }

    pub fn detect_overlap(&self, a: usize, b: usize) -> bool {
        self.elements[a].bbox.intersects(&self.elements[b].bbox)
    }

    /// Indices of every other element whose box currently intersects the
    /// given one, in original element order. Scans the full set, fixed and
    /// movable alike; callers filter by movability when they want less.
    pub fn find_overlaps(&self, index: usize) -> Vec<usize> {
        let bbox = self.elements[index].bbox;
        self.elements
            .iter()
            .enumerate()
            .filter(|(other, element)| *other != index && element.bbox.intersects(&bbox))
            .map(|(other, _)| other)
            .collect()
    }

    /// Run the resolution loop and return the number of iterations executed,
    /// including the final pass that made no progress. A pass scans movable
    /// elements in input order; each sees the fresh positions of elements
    /// handled earlier in the same pass.
    pub fn resolve_clutter(&mut self) -> usize {
        let mut iteration = 0;

        while iteration < self.max_iterations {
            iteration += 1;
            let mut resolved_any = false;

            for i in 0..self.movable.len() {
                let index = self.movable[i];
                let blocked = self
                    .find_overlaps(index)
                    .into_iter()
                    .any(|other| !self.elements[other].movable);
                if !blocked {
                    continue;
                }
                if let Some(bbox) = self.reposition_element(index) {
                    let element = &mut self.elements[index];
                    element.bbox = bbox;
                    element.moved = true;
                    resolved_any = true;
                }
            }

            if !resolved_any {
                break;
            }
        }

        iteration
    }

    /// First candidate translation of the element's current box that clears
    /// every fixed element, or `None` when all eight fail. "No position
    /// found" is an ordinary outcome, not an error; the element then stays
    /// where it is for this pass.
    fn reposition_element(&self, index: usize) -> Option<BoundingBox> {
        let current = self.elements[index].bbox;
        self.offsets
            .iter()
            .map(|(dx, dy)| current.translated(*dx, *dy))
            .find(|candidate| self.candidate_is_valid(candidate))
    }

    /// Valid means intersecting none of the fixed elements. Other movable
    /// elements are deliberately not consulted.
    fn candidate_is_valid(&self, candidate: &BoundingBox) -> bool {
        self.fixed
            .iter()
            .all(|&fixed| !candidate.intersects(&self.elements[fixed].bbox))
    }

    pub fn statistics(&self) -> DeclutterStats {
        let moved_count = self
            .movable
            .iter()
            .filter(|&&index| self.elements[index].moved)
            .count();
        let total_movable = self.movable.len();
        let move_percentage = if total_movable > 0 {
            moved_count as f32 / total_movable as f32 * 100.0
        } else {
            0.0
        };
        DeclutterStats {
            total_elements: self.elements.len(),
            fixed_elements: self.fixed.len(),
            movable_elements: total_movable,
            elements_moved: moved_count,
            move_percentage,
        }
    }
}

/// Number of unordered element pairs currently intersecting.
pub fn count_overlaps(elements: &[MapElement]) -> usize {
    let mut count = 0;
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            if a.bbox.intersects(&b.bbox) {
                count += 1;
            }
        }
    }
    count
}
