//! Maximum caps of the SET plane, F_3^2, printed as state strings.
//!
//! Run with `cargo run -p capsearch --example set_plane`.

use capsearch::{find_maximum_caps, AffineSpace, SearchCfg};

fn main() {
    let space = AffineSpace::new(3, 2).expect("3 is prime");
    let out = find_maximum_caps(space, 1, SearchCfg::default()).expect("search F_3^2");
    println!(
        "{} caps of size {} ({} nodes, {} waves)",
        out.maximal.len(),
        out.best.len(),
        out.stats.nodes,
        out.stats.waves
    );
    for cap in &out.maximal {
        println!("{}  {:?}", cap.to_state_string(&space), cap.indices(&space));
    }
}
