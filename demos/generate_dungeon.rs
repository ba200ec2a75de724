//! Example: Generate a dungeon layout
//!
//! Runs the full pipeline and prints an ASCII map of the result.
//! Set `RUST_LOG=debug` to see per-stage logging.

use rust_dungeon_layout::*;

fn main() {
    env_logger::init();

    println!("Dungeon Layout Generation Example");
    println!("=================================\n");

    let config = DungeonConfigBuilder::new()
        .seed(42)
        .map_size(Vec2::new(60.0, 40.0))
        .unwrap()
        .room_count(8)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Map Size: {} x {}", config.map_size.x, config.map_size.y);
    println!("  Rooms Requested: {} (+ spawn room)", config.room_count);
    println!("  Room Padding: {}", config.room_padding);
    println!();

    let catalog = RoomCatalog::new(
        RoomBlueprint::with_cardinal_doors("Spawn Room", 6.0, 6.0, 3.0),
        vec![
            RoomBlueprint::with_cardinal_doors("Small Room", 4.0, 4.0, 3.0),
            RoomBlueprint::with_cardinal_doors("Hall", 8.0, 4.0, 3.0),
        ],
    );

    let layout = DungeonLayout::generate(config, &catalog).expect("Failed to generate dungeon");

    println!("Statistics:");
    println!("  Rooms placed: {}", layout.room_count());
    println!("  Rooms skipped: {}", layout.skipped_rooms().len());
    println!("  Triangles: {}", layout.triangles().len());
    println!("  Candidate edges: {}", layout.candidate_edges().len());
    println!("  Spanning edges: {}", layout.spanning_edges().len());
    println!("  Corridors: {}", layout.corridors().len());
    println!("  Failed connections: {}", layout.failed_connections().len());
    println!("  Corridor tiles: {}", layout.corridor_tiles().len());
    println!("  Walls: {}", layout.walls().len());
    println!();

    for room in layout.rooms() {
        let open = room
            .doors
            .iter()
            .filter(|d| layout.door_state(d.id) == Some(DoorState::Open))
            .count();
        println!(
            "  Room {} '{}': center=({:.1}, {:.1}), open doors={}/{}",
            room.handle.0,
            room.blueprint,
            room.center().x,
            room.center().z,
            open,
            room.doors.len()
        );
    }
    println!();

    print_map(&layout);
    println!("\nGeneration complete!");
}

/// One character per grid cell: `#` room, `.` corridor, blank otherwise
fn print_map(layout: &DungeonLayout) {
    let grid = layout.grid();
    for row in (0..grid.height()).rev() {
        let line: String = (0..grid.width())
            .map(|column| {
                let position = grid.world_position(column, row);
                if layout.room_at(Vec2::new(position.x, position.z)).is_some() {
                    '#'
                } else if layout.corridor_tiles().contains(position) {
                    '.'
                } else {
                    ' '
                }
            })
            .collect();
        println!("{}", line.trim_end());
    }
}
