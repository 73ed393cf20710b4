use std::fs;
use std::path::{Path, PathBuf};

use gw2link_core::link::layout::{self, Field, context, primary};
use gw2link_core::{MemorySource, read_snapshot};

const CLIENT_NAME: &str = "Guild Wars 2";

/// Renders each golden segment and the snapshot it decodes to.
///
/// `expected_snapshot.json` is produced by the library itself, so review the
/// diff before committing regenerated fixtures.
fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    for (case, fixture) in cases() {
        let dir = root.join(case);
        let segment = render_segment(&fixture);
        write_file(&dir.join("input.bin"), &segment)?;

        let snapshot = read_snapshot(&mut MemorySource::new(segment))
            .map_err(|err| format!("{case}: fixture does not decode: {err}"))?;
        let json = serde_json::to_string(&snapshot)
            .map_err(|err| format!("{case}: JSON serialization failed: {err}"))?;
        write_file(&dir.join("expected_snapshot.json"), json.as_bytes())?;
        println!("{case}: map {} at {:?}", snapshot.map_id, snapshot.position);
    }
    Ok(())
}

fn cases() -> [(&'static str, FixtureSegment); 3] {
    [
        (
            "queensdale",
            FixtureSegment {
                ui_tick: 999,
                avatar_position: [-120.25, 35.5, 842.0],
                identity: r#"{"name":"Foo Bar","profession":4,"race":1,"spec":55,"commander":false,"team_color_id":0,"world_id":1001,"map_id":15,"fov":0.873,"uisz":1}"#,
                context_len: layout::CONTEXT_SIZE as u32,
                map_id: 15,
                map_type: 5,
                build_id: 12345,
                player: [12.5, -3.5],
            },
        ),
        (
            "commander",
            FixtureSegment {
                ui_tick: 123_456_789_012,
                avatar_position: [310.0, -12.75, -1024.5],
                identity: r#"{"name":"Ærin Ŝtorm","profession":1,"race":4,"spec":62,"commander":true,"team_color_id":9,"world_id":2101,"map_id":1206,"fov":1.222,"uisz":2}"#,
                context_len: layout::CONTEXT_SIZE as u32,
                map_id: 1206,
                map_type: 9,
                build_id: 170_000,
                player: [46012.5, 28203.5],
            },
        ),
        (
            "partial_context",
            FixtureSegment {
                ui_tick: 42,
                avatar_position: [0.0, 0.0, 0.0],
                identity: r#"{"name":"Partial","profession":8,"race":3,"spec":0,"commander":false,"team_color_id":0}"#,
                context_len: 48,
                map_id: 50,
                map_type: 4,
                build_id: 99,
                player: [-0.5, 1.5],
            },
        ),
    ]
}

struct FixtureSegment {
    ui_tick: u64,
    avatar_position: [f32; 3],
    identity: &'static str,
    context_len: u32,
    map_id: u32,
    map_type: u32,
    build_id: u32,
    player: [f32; 2],
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}

fn render_segment(fixture: &FixtureSegment) -> Vec<u8> {
    let base = layout::PRIMARY_SIZE;
    let mut segment = vec![0u8; layout::SEGMENT_SIZE];

    put(&mut segment, 0, &primary::UI_VERSION, &2u32.to_le_bytes());
    put(&mut segment, 0, &primary::UI_TICK, &fixture.ui_tick.to_le_bytes());
    put(
        &mut segment,
        0,
        &primary::AVATAR_POSITION,
        &vec3_bytes(fixture.avatar_position),
    );
    put(&mut segment, 0, &primary::AVATAR_FRONT, &vec3_bytes([0.0, 0.0, 1.0]));
    put(&mut segment, 0, &primary::AVATAR_TOP, &vec3_bytes([0.0, 1.0, 0.0]));
    put(&mut segment, 0, &primary::NAME, &utf16_bytes(CLIENT_NAME));
    put(
        &mut segment,
        0,
        &primary::CAMERA_POSITION,
        &vec3_bytes(fixture.avatar_position),
    );
    put(&mut segment, 0, &primary::CAMERA_FRONT, &vec3_bytes([0.0, 0.0, 1.0]));
    put(&mut segment, 0, &primary::CAMERA_TOP, &vec3_bytes([0.0, 1.0, 0.0]));
    put(&mut segment, 0, &primary::IDENTITY, &utf16_bytes(fixture.identity));
    put(&mut segment, 0, &primary::CONTEXT_LEN, &fixture.context_len.to_le_bytes());

    put(&mut segment, base, &context::MAP_ID, &fixture.map_id.to_le_bytes());
    put(&mut segment, base, &context::MAP_TYPE, &fixture.map_type.to_le_bytes());
    put(&mut segment, base, &context::BUILD_ID, &fixture.build_id.to_le_bytes());
    put(&mut segment, base, &context::COMPASS_WIDTH, &362u16.to_le_bytes());
    put(&mut segment, base, &context::COMPASS_HEIGHT, &338u16.to_le_bytes());
    put(&mut segment, base, &context::PLAYER_X, &fixture.player[0].to_le_bytes());
    put(&mut segment, base, &context::PLAYER_Y, &fixture.player[1].to_le_bytes());
    put(&mut segment, base, &context::MAP_SCALE, &1.0f32.to_le_bytes());
    segment
}

fn put(segment: &mut [u8], base: usize, field: &Field, bytes: &[u8]) {
    assert!(bytes.len() <= field.size(), "{} overflows", field.name);
    let start = base + field.offset;
    segment[start..start + bytes.len()].copy_from_slice(bytes);
}

fn vec3_bytes(values: [f32; 3]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

fn utf16_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
