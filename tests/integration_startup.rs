//! Integration test to ensure a level can be built and queried end to end.

use delve::{
    cast_sight, compute_distance_field, find_path, refresh_visibility, DelveError, DelveResult,
    GenerationConfig, LevelGenerator, Occupants, TileType, TileTypeMask,
};

#[test]
fn test_basic_startup() -> DelveResult<()> {
    let config = GenerationConfig::new(12345);
    let mut level = LevelGenerator::new().try_generate(&config)?;

    let start = level.start.expect("default level has a start");
    assert_eq!(level.grid.tile_type(start), Some(TileType::Start));

    let occupants = Occupants::new();
    assert!(cast_sight(&mut level.grid, &occupants, start, start, true));
    assert!(refresh_visibility(&mut level.grid, &occupants, start, delve::config::DEFAULT_SIGHT_RADIUS) > 0);

    let reached = compute_distance_field(&mut level.grid, start, TileTypeMask::LOCKED_DOOR);
    assert!(reached > 1);

    let exit = level.exit.expect("default level has an exit");
    // Locked doors block the pathfinder.
    let path = find_path(&level.grid, &occupants, start, exit, true);
    if level.rooms.len() > 1 {
        assert!(path.is_empty());
    }
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> DelveResult<()> {
    let json = r#"{ "seed": 99, "width": 25, "height": 19 }"#;
    let config = GenerationConfig::from_json_str(json)?;
    assert_eq!(config.seed, 99);
    assert_eq!((config.width, config.height), (25, 19));
    assert_eq!(config.room_attempts, delve::config::DEFAULT_ROOM_ATTEMPTS);

    let level = LevelGenerator::new().try_generate(&config)?;
    assert_eq!(level.grid.width(), 25);
    assert_eq!(level.summary().map.len(), 19);
    Ok(())
}

#[test]
fn test_config_from_file() -> DelveResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("level.json");
    let config = GenerationConfig::for_testing(5);
    std::fs::write(&path, serde_json::to_string_pretty(&config)?)?;

    let loaded = GenerationConfig::from_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_bad_config_is_an_error() {
    let even = GenerationConfig::new(1).with_size(20, 21);
    assert!(matches!(
        LevelGenerator::new().try_generate(&even),
        Err(DelveError::InvalidConfig(_))
    ));

    assert!(matches!(
        GenerationConfig::from_json_str("{ \"width\": "),
        Err(DelveError::Serde(_))
    ));
    assert!(matches!(
        GenerationConfig::from_file("/nonexistent/delve.json"),
        Err(DelveError::Io(_))
    ));
}

#[test]
fn test_summary_serializes() -> DelveResult<()> {
    let level = LevelGenerator::new().try_generate(&GenerationConfig::for_testing(8))?;
    let json = serde_json::to_string(&level.summary())?;
    assert!(json.contains("\"map\""));
    assert!(json.contains("\"rooms\""));
    Ok(())
}
