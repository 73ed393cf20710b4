use gw2link_core::link::layout::{self, Field, context, primary};
use gw2link_core::{
    AssembleError, DecodeError, LinkError, MemorySource, PositionTrail, Snapshot, TrailEvent,
    decode_link, read_snapshot, read_stable_link,
};
use serde_json::json;

struct Segment {
    bytes: Vec<u8>,
}

impl Segment {
    fn new() -> Self {
        Self {
            bytes: vec![0u8; layout::SEGMENT_SIZE],
        }
    }

    fn put(&mut self, base: usize, field: &Field, bytes: &[u8]) -> &mut Self {
        let start = base + field.offset;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        self
    }

    fn primary(&mut self, field: &Field, bytes: &[u8]) -> &mut Self {
        self.put(0, field, bytes)
    }

    fn context(&mut self, field: &Field, bytes: &[u8]) -> &mut Self {
        self.put(layout::PRIMARY_SIZE, field, bytes)
    }

    fn identity(&mut self, text: &str) -> &mut Self {
        let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        self.primary(&primary::IDENTITY, &bytes)
    }

    fn player(&mut self, x: f32, y: f32) -> &mut Self {
        self.context(&context::PLAYER_X, &x.to_le_bytes())
            .context(&context::PLAYER_Y, &y.to_le_bytes())
    }

    fn tick(&mut self, tick: u64) -> &mut Self {
        self.primary(&primary::UI_TICK, &tick.to_le_bytes())
    }

    fn link_bytes(&self) -> &[u8] {
        &self.bytes[..layout::LINK_SIZE]
    }
}

fn game_state() -> Segment {
    let mut segment = Segment::new();
    segment
        .primary(&primary::UI_VERSION, &2u32.to_le_bytes())
        .tick(999)
        .identity(
            r#"{"name":"Foo","profession":1,"race":2,"spec":3,"commander":false,"team_color_id":0}"#,
        )
        .primary(&primary::CONTEXT_LEN, &(layout::CONTEXT_SIZE as u32).to_le_bytes())
        .context(&context::MAP_ID, &15u32.to_le_bytes())
        .context(&context::BUILD_ID, &12345u32.to_le_bytes())
        .player(12.5, -3.5);
    segment
}

#[test]
fn known_game_state_yields_expected_mapping() {
    let segment = game_state();
    let mut source = MemorySource::new(segment.bytes.clone());
    let snapshot = read_snapshot(&mut source).expect("snapshot");

    assert_eq!(
        serde_json::to_value(&snapshot).expect("json"),
        json!({
            "name": "Foo",
            "profession": 1,
            "race": 2,
            "spec": 3,
            "commander": false,
            "team_color_id": 0,
            "map_id": 15,
            "build_id": 12345,
            "ui_tick": 999,
            "position": [12, -4]
        })
    );
}

#[test]
fn build_id_bytes_decode_at_layout_offset() {
    let mut segment = game_state();
    segment.context(&context::BUILD_ID, &[0x01, 0x00, 0x00, 0x00]);
    let link = decode_link(segment.link_bytes()).expect("decode");
    assert_eq!(link.context.build_id, 1);
}

#[test]
fn missing_identity_key_fails_whole_snapshot() {
    let mut segment = game_state();
    let mut identity = vec![0u8; primary::IDENTITY.size()];
    let text: Vec<u8> =
        r#"{"name":"Foo","profession":1,"race":2,"commander":true,"team_color_id":0}"#
            .encode_utf16()
            .flat_map(u16::to_le_bytes)
            .collect();
    identity[..text.len()].copy_from_slice(&text);
    segment.primary(&primary::IDENTITY, &identity);

    let mut source = MemorySource::new(segment.bytes.clone());
    let err = read_snapshot(&mut source).unwrap_err();
    assert!(matches!(
        err,
        LinkError::Assemble(AssembleError::MalformedIdentity(_))
    ));
}

#[test]
fn truncated_segment_fails_before_assembly() {
    let segment = game_state();
    let mut source = MemorySource::new(segment.bytes[..layout::LINK_SIZE - 1].to_vec());
    let err = read_snapshot(&mut source).unwrap_err();
    assert!(matches!(
        err,
        LinkError::Decode(DecodeError::TruncatedBuffer { .. })
    ));
}

#[test]
fn out_of_range_position_fails_instead_of_clamping() {
    let mut segment = game_state();
    segment.player(1e20, -3e19);
    let mut source = MemorySource::new(segment.bytes.clone());
    let err = read_snapshot(&mut source).unwrap_err();
    assert!(matches!(
        err,
        LinkError::Assemble(AssembleError::PositionOutOfRange { axis: "x", .. })
    ));
}

#[test]
fn stable_read_then_trail() {
    let mut segment = game_state();
    let mut source = MemorySource::new(segment.bytes.clone());
    let mut trail = PositionTrail::new();
    let mut lines = Vec::new();

    for (tick, (x, y)) in [(1000u64, (12.5, -3.5)), (1001, (12.5, -3.5)), (1002, (20.0, 4.4))] {
        segment.tick(tick).player(x, y);
        source.overwrite(segment.bytes.clone());
        let link = read_stable_link(&mut source, 3).expect("stable link");
        let snapshot: Snapshot = gw2link_core::assemble_link(&link).expect("snapshot");
        if let Some(event) = trail.observe(&snapshot) {
            lines.push(event);
        }
    }

    assert_eq!(
        lines,
        vec![
            TrailEvent::Start {
                map_id: 15,
                position: [12, -4],
            },
            TrailEvent::Moved { position: [20, 4] },
        ]
    );
}
