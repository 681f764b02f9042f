//! Synthetic log builders shared by the integration tests

#![allow(dead_code)]

const SYNC: [u8; 2] = [0xA3, 0x95];
const FMT_TYPE: u8 = 128;

pub const GPS_TYPE: u8 = 130;
pub const ATT_TYPE: u8 = 131;
pub const BAT_TYPE: u8 = 132;
pub const CTUN_TYPE: u8 = 133;
pub const MODE_TYPE: u8 = 134;

fn char_width(c: char) -> usize {
    match c {
        'b' | 'B' | 'M' => 1,
        'h' | 'H' | 'c' | 'C' => 2,
        'i' | 'I' | 'e' | 'E' | 'L' | 'f' | 'n' => 4,
        'q' | 'Q' | 'd' => 8,
        'N' => 16,
        'Z' | 'a' => 64,
        other => panic!("unsupported format char {other}"),
    }
}

/// Little-endian record payload
#[derive(Default)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn i16(mut self, v: i16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(mut self, v: i32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32(mut self, v: f32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
}

/// Builds a DataFlash-style byte stream
#[derive(Default)]
pub struct BinaryLogBuilder {
    bytes: Vec<u8>,
}

impl BinaryLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fmt(mut self, type_code: u8, name: &str, format: &str, columns: &str) -> Self {
        let length = 3 + format.chars().map(char_width).sum::<usize>();
        self.bytes.extend_from_slice(&SYNC);
        self.bytes.push(FMT_TYPE);
        self.bytes.push(type_code);
        self.bytes.push(length as u8);
        for (text, width) in [(name, 4), (format, 16), (columns, 64)] {
            let mut field = text.as_bytes().to_vec();
            field.resize(width, 0);
            self.bytes.extend_from_slice(&field);
        }
        self
    }

    pub fn record(mut self, type_code: u8, payload: Payload) -> Self {
        self.bytes.extend_from_slice(&SYNC);
        self.bytes.push(type_code);
        self.bytes.extend_from_slice(&payload.0);
        self
    }

    pub fn garbage(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// A 60 s flight sampled at 1 Hz: northbound at ~11 m/s, climbing then
/// descending, battery sagging from 16.8 V to about 15.0 V, yaw turning
/// through north, one mode change to LOITER.
pub fn synthetic_flight() -> Vec<u8> {
    let mut log = BinaryLogBuilder::new()
        .fmt(GPS_TYPE, "GPS", "QBBLLe", "TimeUS,Status,NSats,Lat,Lng,Alt")
        .fmt(ATT_TYPE, "ATT", "QccC", "TimeUS,Roll,Pitch,Yaw")
        .fmt(BAT_TYPE, "BAT", "Qff", "TimeUS,Volt,Curr")
        .fmt(CTUN_TYPE, "CTUN", "Qf", "TimeUS,Alt")
        .fmt(MODE_TYPE, "MODE", "QMB", "TimeUS,Mode,ModeNum");

    for second in 0..60u64 {
        let time_us = (second + 1) * 1_000_000;
        let altitude = if second < 30 {
            second as f32 * 2.0
        } else {
            (60 - second) as f32 * 2.0
        };
        let yaw_centideg = ((340 + second * 2) % 360) as u16 * 100;

        log = log
            .record(
                GPS_TYPE,
                Payload::new()
                    .u64(time_us)
                    .u8(3)
                    .u8(12)
                    .i32(377_749_000 + second as i32 * 1_000)
                    .i32(-1_224_194_000)
                    .i32(1_000 + altitude as i32 * 100),
            )
            .record(
                ATT_TYPE,
                Payload::new().u64(time_us).i16(150).i16(-220).u16(yaw_centideg),
            )
            .record(
                BAT_TYPE,
                Payload::new()
                    .u64(time_us)
                    .f32(16.8 - second as f32 * 0.03)
                    .f32(12.0),
            )
            .record(CTUN_TYPE, Payload::new().u64(time_us).f32(altitude));

        if second == 10 {
            log = log.record(MODE_TYPE, Payload::new().u64(time_us).u8(5).u8(5));
        }
    }
    log.build()
}

/// The same kind of flight as a text log, with one learned and several
/// built-in layouts
pub fn synthetic_text_flight() -> String {
    let mut lines = vec![
        "FMT, 140, 19, VIBE, Qff, TimeUS,VibeX,VibeY".to_string(),
        String::new(),
    ];
    for second in 0..20u64 {
        let time_us = (second + 1) * 1_000_000;
        lines.push(format!(
            "GPS, {time_us}, 3, 0, 0, 11, 95, {}, -1224194000, {:.1}, 0, 0, 0, 0, 1",
            377_749_000 + second * 1_000,
            10.0 + second as f64
        ));
        lines.push(format!(
            "BAT, {time_us}, 0, {:.2}, 0, 8.5, 0, 0, 30, 0",
            16.8 - second as f64 * 0.05
        ));
        lines.push(format!("VIBE, {time_us}, 1.5, 2.5"));
        lines.push(format!("XKF1, {time_us}, 1, 2, 3"));
    }
    lines.push("MODE, 5000000, RTL, 6, 1".to_string());
    lines.join("\n")
}
