//! Damped spring relaxation over the linked nodes of a graph.

use crate::algo::SpringOptions;
use crate::graph::Point;
use crate::rng::JitterSource;
use crate::topology::Topology;
use nalgebra::Vector2;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq)]
struct MassPoint {
    position: Vector2<f64>,
    velocity: Vector2<f64>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpringStats {
    pub iterations: usize,
    pub settled: bool,
}

/// Slot-indexed simulation state.
///
/// Slots follow the flattened component partition, so every component occupies a contiguous
/// slot range and edges are stored as slot pairs.
#[derive(Debug, Clone)]
pub struct Simulation {
    points: Vec<MassPoint>,
    slot_node: Vec<usize>,
    edges: Vec<(usize, usize)>,
    components: Vec<Range<usize>>,
}

impl Simulation {
    pub fn new(topology: &Topology<'_>) -> Self {
        let mut slot_of: Vec<Option<usize>> = vec![None; topology.node_count()];
        let mut slot_node: Vec<usize> = Vec::with_capacity(topology.linked().len());
        let mut components: Vec<Range<usize>> = Vec::with_capacity(topology.components().len());
        for component in topology.components() {
            let start = slot_node.len();
            for &node in component {
                slot_of[node] = Some(slot_node.len());
                slot_node.push(node);
            }
            components.push(start..slot_node.len());
        }
        let edges = topology
            .edges()
            .iter()
            .filter_map(|&(a, b)| Some((slot_of[a]?, slot_of[b]?)))
            .collect();
        let rest = MassPoint {
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
        };
        Self {
            points: vec![rest; slot_node.len()],
            slot_node,
            edges,
            components,
        }
    }

    /// Places every slot on a ring around the origin whose radius grows with the square root of
    /// the slot count, at evenly spaced angles, each coordinate nudged by jitter.
    pub fn seed_ring(&mut self, opts: &SpringOptions, jitter: &mut dyn JitterSource) {
        let n = self.points.len();
        if n == 0 {
            return;
        }
        let radius = (n as f64).sqrt() * opts.ring_scale + opts.ring_base;
        for (slot, p) in self.points.iter_mut().enumerate() {
            let angle = std::f64::consts::TAU * (slot as f64) / (n as f64);
            let jx = jitter.next_signed() * opts.jitter;
            let jy = jitter.next_signed() * opts.jitter;
            p.position = Vector2::new(radius * angle.cos() + jx, radius * angle.sin() + jy);
            p.velocity = Vector2::zeros();
        }
    }

    pub fn run(&mut self, opts: &SpringOptions) -> SpringStats {
        let mut stats = SpringStats::default();
        if self.points.is_empty() {
            return stats;
        }
        let mut temperature = opts.initial_temperature;
        for _ in 0..opts.iterations {
            self.apply_edge_springs(opts.spring_constant);
            self.apply_centering(opts.centering_constant);
            self.apply_cohesion(opts.cohesion_constant);
            let total_speed = self.integrate(temperature * opts.velocity_cap_factor, opts.damping);
            temperature *= opts.cooling_rate;
            stats.iterations += 1;

            if opts.settle_threshold.is_some_and(|t| total_speed < t) {
                stats.settled = true;
                break;
            }
        }
        stats
    }

    /// Final `(node index, position)` pairs in slot order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.slot_node
            .iter()
            .zip(&self.points)
            .map(|(&node, p)| (node, Point::new(p.position.x, p.position.y)))
    }

    fn apply_edge_springs(&mut self, k: f64) {
        for &(a, b) in &self.edges {
            let delta = self.points[b].position - self.points[a].position;
            let dist = delta.norm().max(1.0);
            let pull = (delta / dist) * (dist * k);
            self.points[a].velocity += pull;
            self.points[b].velocity -= pull;
        }
    }

    fn apply_centering(&mut self, k: f64) {
        for p in &mut self.points {
            p.velocity -= p.position * k;
        }
    }

    fn apply_cohesion(&mut self, k: f64) {
        for range in &self.components {
            if range.len() < 2 {
                continue;
            }
            let members = &mut self.points[range.clone()];
            let sum = members
                .iter()
                .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.position);
            let centroid = sum / (members.len() as f64);
            for p in members {
                p.velocity += (centroid - p.position) * k;
            }
        }
    }

    /// Caps each velocity at `cap`, moves the point, then damps. Returns the summed capped speed.
    fn integrate(&mut self, cap: f64, damping: f64) -> f64 {
        let mut total_speed = 0.0;
        for p in &mut self.points {
            let speed = p.velocity.norm();
            if speed > cap {
                p.velocity *= cap / speed;
            }
            total_speed += speed.min(cap);
            p.position += p.velocity;
            p.velocity *= damping;
        }
        total_speed
    }
}

/// Seeds and relaxes the linked nodes of `topology`. Returns `(node index, position)` pairs in
/// slot order.
pub fn simulate(
    topology: &Topology<'_>,
    opts: &SpringOptions,
    jitter: &mut dyn JitterSource,
) -> (Vec<(usize, Point)>, SpringStats) {
    let mut sim = Simulation::new(topology);
    sim.seed_ring(opts, jitter);
    let stats = sim.run(opts);
    (sim.positions().collect(), stats)
}

#[cfg(test)]
mod tests {
    use super::{MassPoint, Simulation};
    use crate::algo::SpringOptions;
    use crate::rng::ConstantJitter;
    use crate::topology::Topology;
    use nalgebra::Vector2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn place(sim: &mut Simulation, slot: usize, x: f64, y: f64) {
        sim.points[slot] = MassPoint {
            position: Vector2::new(x, y),
            velocity: Vector2::zeros(),
        };
    }

    #[test]
    fn slots_follow_flattened_components() {
        let t = Topology::build(["a", "b", "c", "d", "e"], [("a", "d"), ("b", "c")]);
        let sim = Simulation::new(&t);
        assert_eq!(sim.slot_node, vec![0, 3, 1, 2]);
        assert_eq!(sim.components, vec![0..2, 2..4]);
        assert_eq!(sim.edges, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn edge_spring_is_linear_in_distance() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        place(&mut sim, 0, -50.0, 0.0);
        place(&mut sim, 1, 50.0, 0.0);
        sim.apply_edge_springs(0.25);
        assert!(close(sim.points[0].velocity.x, 25.0));
        assert!(close(sim.points[1].velocity.x, -25.0));
        assert!(close(sim.points[0].velocity.y, 0.0));
    }

    #[test]
    fn coincident_endpoints_do_not_produce_nan() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        place(&mut sim, 0, 3.0, 3.0);
        place(&mut sim, 1, 3.0, 3.0);
        sim.apply_edge_springs(0.25);
        assert!(sim.points.iter().all(|p| p.velocity.x == 0.0 && p.velocity.y == 0.0));
    }

    #[test]
    fn centering_pulls_towards_origin() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        place(&mut sim, 0, 10.0, 20.0);
        sim.apply_centering(0.1);
        assert!(close(sim.points[0].velocity.x, -1.0));
        assert!(close(sim.points[0].velocity.y, -2.0));
    }

    #[test]
    fn cohesion_pulls_members_to_their_own_centroid() {
        let t = Topology::build(["a", "b", "c", "d"], [("a", "b"), ("c", "d")]);
        let mut sim = Simulation::new(&t);
        place(&mut sim, 0, 0.0, 0.0);
        place(&mut sim, 1, 10.0, 0.0);
        place(&mut sim, 2, 1000.0, 1000.0);
        place(&mut sim, 3, 1000.0, 1020.0);
        sim.apply_cohesion(0.05);
        assert!(close(sim.points[0].velocity.x, 0.25));
        assert!(close(sim.points[1].velocity.x, -0.25));
        assert!(close(sim.points[2].velocity.y, 0.5));
        assert!(close(sim.points[3].velocity.y, -0.5));
        assert!(close(sim.points[2].velocity.x, 0.0));
    }

    #[test]
    fn integrate_caps_then_moves_then_damps() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        sim.points[0].velocity = Vector2::new(300.0, 400.0);
        let total = sim.integrate(50.0, 0.3);
        assert!(close(total, 50.0));
        assert!(close(sim.points[0].position.x, 30.0));
        assert!(close(sim.points[0].position.y, 40.0));
        assert!(close(sim.points[0].velocity.x, 9.0));
        assert!(close(sim.points[0].velocity.y, 12.0));
    }

    #[test]
    fn velocity_cap_cools_every_iteration() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        place(&mut sim, 0, -1000.0, 0.0);
        place(&mut sim, 1, 1000.0, 0.0);
        let opts = SpringOptions {
            iterations: 2,
            ..SpringOptions::default()
        };
        let stats = sim.run(&opts);
        assert_eq!(stats.iterations, 2);

        // Iteration 1: edge 500 + centering 100 + cohesion 50 = 650, capped at 4.0 * 50 = 200.
        // Iteration 2: 0.3 * 200 + 400 + 80 + 40 = 580, capped at 3.84 * 50 = 192.
        assert!(close(sim.points[0].position.x, -608.0), "{}", sim.points[0].position.x);
        assert!(close(sim.points[1].position.x, 608.0));
        assert!(close(sim.points[0].velocity.x, 57.6));
        assert!(close(sim.points[1].velocity.x, -57.6));
        assert!(close(sim.points[0].position.y, 0.0));
    }

    #[test]
    fn ring_radius_grows_with_node_count() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        sim.seed_ring(&SpringOptions::default(), &mut ConstantJitter(0.0));
        let r = 2f64.sqrt() * 390.0 + 3500.0;
        assert!(close(sim.points[0].position.x, r));
        assert!(close(sim.points[0].position.y, 0.0));
        assert!(close(sim.points[1].position.x, -r));
        assert!(sim.points[1].position.y.abs() < 1e-6);
    }

    #[test]
    fn jitter_offsets_both_coordinates() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        sim.seed_ring(&SpringOptions::default(), &mut ConstantJitter(0.5));
        let r = 2f64.sqrt() * 390.0 + 3500.0;
        assert!(close(sim.points[0].position.x, r + 50.0));
        assert!(close(sim.points[0].position.y, 50.0));
    }

    #[test]
    fn relaxation_contracts_the_seed_ring() {
        let t = Topology::build(["a", "b", "c"], [("a", "b"), ("b", "c")]);
        let mut sim = Simulation::new(&t);
        let opts = SpringOptions::default();
        sim.seed_ring(&opts, &mut ConstantJitter(0.25));
        let before: f64 = sim.points.iter().map(|p| p.position.norm()).sum();
        let stats = sim.run(&opts);
        let after: f64 = sim.points.iter().map(|p| p.position.norm()).sum();
        assert_eq!(stats.iterations, 100);
        assert!(!stats.settled);
        assert!(after < before / 2.0, "before={before} after={after}");
        assert!(sim.points.iter().all(|p| p.position.x.is_finite() && p.position.y.is_finite()));
    }

    #[test]
    fn zero_iterations_keep_seed_positions() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        let opts = SpringOptions {
            iterations: 0,
            ..SpringOptions::default()
        };
        sim.seed_ring(&opts, &mut ConstantJitter(0.0));
        let seeded = sim.points.clone();
        assert_eq!(sim.run(&opts).iterations, 0);
        assert_eq!(sim.points, seeded);
    }

    #[test]
    fn settle_threshold_stops_early() {
        let t = Topology::build(["a", "b"], [("a", "b")]);
        let mut sim = Simulation::new(&t);
        let opts = SpringOptions {
            settle_threshold: Some(f64::INFINITY),
            ..SpringOptions::default()
        };
        sim.seed_ring(&opts, &mut ConstantJitter(0.0));
        let stats = sim.run(&opts);
        assert_eq!(stats.iterations, 1);
        assert!(stats.settled);
    }
}
