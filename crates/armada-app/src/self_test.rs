//! Runtime self-tests for `--unitTests`.
//!
//! Exercises the geometry kernel and the mob-set container with plain
//! asserts so a release binary can sanity-check itself on a new machine.

use armada_core::mob::{Mob, MobSet, MobType, MOB_FLAG_FIGHTER, MOB_FLAG_SHIP};
use armada_core::rng::SimRng;
use armada_core::types::{circle_intersect_batch, Circle, Point, LANES};

pub fn run() {
    println!("Starting unit tests ...");
    geometry_self_test();
    mob_set_self_test();
    println!("Done!");
}

fn geometry_self_test() {
    let mut p = Point::new(0.0, 0.0);
    p.move_toward(&Point::new(3.0, 4.0), 10.0);
    assert_eq!(p, Point::new(3.0, 4.0));

    let mut q = Point::new(0.0, 0.0);
    q.move_toward(&Point::new(3.0, 4.0), 2.5);
    assert!((q.distance_to(&Point::new(0.0, 0.0)) - 2.5).abs() < 1e-4);

    let mut out = Point::new(-10.0, 5000.0);
    out.clamp(100.0, 100.0);
    assert_eq!(out, Point::new(0.0, 100.0));

    // The batched kernel must agree with the scalar path everywhere.
    let mut rng = SimRng::new(0xf00d);
    for _ in 0..1000 {
        let outer = Circle::new(
            Point::new(rng.float(0.0, 256.0), rng.float(0.0, 256.0)),
            rng.float(0.0, 32.0),
        );
        let mut xs = [0.0f32; LANES];
        let mut ys = [0.0f32; LANES];
        let mut rs = [0.0f32; LANES];
        for i in 0..LANES {
            xs[i] = rng.float(0.0, 256.0);
            ys[i] = rng.float(0.0, 256.0);
            rs[i] = rng.float(0.0, 32.0);
        }
        let mask = circle_intersect_batch(&outer, &xs, &ys, &rs);
        for i in 0..LANES {
            let inner = Circle::new(Point::new(xs[i], ys[i]), rs[i]);
            assert_eq!(mask & (1 << i) != 0, outer.intersects(&inner));
        }
    }
}

fn mob_set_self_test() {
    let mut set = MobSet::new();
    for i in 0..100u32 {
        let mob_type = if i % 2 == 0 {
            MobType::Fighter
        } else {
            MobType::Missile
        };
        set.insert(Mob::new(i + 1, mob_type, 1, Point::new(i as f32, 0.0)));
    }
    assert_eq!(set.len(), 100);
    assert_eq!(set.iter_type(MOB_FLAG_FIGHTER).count(), 50);

    let origin = Point::new(0.0, 0.0);
    assert_eq!(set.find_closest(&origin, MOB_FLAG_SHIP).unwrap().mobid, 1);
    assert_eq!(
        set.find_nth_closest(&origin, MOB_FLAG_FIGHTER, 1).unwrap().mobid,
        3
    );

    for i in 0..50u32 {
        assert!(set.remove(i * 2 + 1).is_some());
    }
    assert_eq!(set.len(), 50);
    assert_eq!(set.iter_type(MOB_FLAG_FIGHTER).count(), 0);
    for i in 0..50u32 {
        assert!(set.contains(i * 2 + 2));
    }
}
