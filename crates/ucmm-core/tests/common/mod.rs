//! In-memory ICC profile builder shared by the integration tests and benches

#![allow(dead_code)]

/// D50 as written in ICC headers
pub const D50: [f64; 3] = [0.9642, 1.0, 0.8249];

/// sRGB primaries adapted to D50 (Bradford), as in the ICC sRGB profile
pub const SRGB_D50_COLORANTS: [[f64; 3]; 3] = [
    [0.4360747, 0.2225045, 0.0139322],
    [0.3850649, 0.7168786, 0.0971045],
    [0.1430804, 0.0606169, 0.7141733],
];

pub fn s15(v: f64) -> [u8; 4] {
    ((v * 65536.0).round() as i32).to_be_bytes()
}

fn type_header(sig: &[u8; 4]) -> Vec<u8> {
    let mut data = sig.to_vec();
    data.extend([0u8; 4]);
    data
}

pub fn xyz(v: [f64; 3]) -> Vec<u8> {
    let mut data = type_header(b"XYZ ");
    for c in v {
        data.extend(s15(c));
    }
    data
}

pub fn curv(samples: &[u16]) -> Vec<u8> {
    let mut data = type_header(b"curv");
    data.extend((samples.len() as u32).to_be_bytes());
    for s in samples {
        data.extend(s.to_be_bytes());
    }
    data
}

/// curv with a single U8Fixed8 gamma
pub fn curv_gamma(gamma: f64) -> Vec<u8> {
    curv(&[(gamma * 256.0).round() as u16])
}

/// para type 3 with the sRGB constants
pub fn para_srgb() -> Vec<u8> {
    let mut data = type_header(b"para");
    data.extend(3u16.to_be_bytes());
    data.extend([0u8; 2]);
    for p in [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045] {
        data.extend(s15(p));
    }
    data
}

pub fn desc(text: &str) -> Vec<u8> {
    let mut data = type_header(b"desc");
    data.extend((text.len() as u32 + 1).to_be_bytes());
    data.extend(text.as_bytes());
    data.push(0);
    data.extend([0u8; 8]);
    data.extend([0u8; 3]);
    data.extend([0u8; 67]);
    data
}

pub fn mluc(records: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut data = type_header(b"mluc");
    data.extend((records.len() as u32).to_be_bytes());
    data.extend(12u32.to_be_bytes());
    let mut offset = 16 + 12 * records.len();
    let mut strings = Vec::new();
    for (lang, country, text) in records {
        let utf16: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        data.extend(lang.as_bytes());
        data.extend(country.as_bytes());
        data.extend((utf16.len() as u32).to_be_bytes());
        data.extend((offset as u32).to_be_bytes());
        offset += utf16.len();
        strings.extend(utf16);
    }
    data.extend(strings);
    data
}

/// lut16 with identity matrix, two-entry identity tables and a CLUT whose
/// output `o` at each node is `node(coords)[o]`.
pub fn lut16(
    inputs: u8,
    outputs: u8,
    grid: u8,
    node: impl Fn(&[f64]) -> Vec<f64>,
) -> Vec<u8> {
    let mut data = type_header(b"mft2");
    data.extend([inputs, outputs, grid, 0]);
    for row in 0..3 {
        for col in 0..3 {
            data.extend(s15(if row == col { 1.0 } else { 0.0 }));
        }
    }
    data.extend(2u16.to_be_bytes());
    data.extend(2u16.to_be_bytes());
    for _ in 0..inputs {
        data.extend([0x00, 0x00, 0xFF, 0xFF]);
    }
    for coords in grid_nodes(inputs, grid) {
        let values = node(&coords);
        assert_eq!(values.len(), outputs as usize);
        for v in values {
            data.extend(((v.clamp(0.0, 1.0) * 65535.0).round() as u16).to_be_bytes());
        }
    }
    for _ in 0..outputs {
        data.extend([0x00, 0x00, 0xFF, 0xFF]);
    }
    data
}

/// Sampled curv with `count` entries of `f` over `[0, 1]`
pub fn curv_table(count: usize, f: impl Fn(f64) -> f64) -> Vec<u8> {
    let samples: Vec<u16> = (0..count)
        .map(|i| {
            let x = i as f64 / (count - 1) as f64;
            (f(x).clamp(0.0, 1.0) * 65535.0).round() as u16
        })
        .collect();
    curv(&samples)
}

/// Identity-grid CLUT nodes, first input varying slowest
fn grid_nodes(inputs: u8, grid: u8) -> impl Iterator<Item = Vec<f64>> {
    let nodes = (grid as usize).pow(inputs as u32);
    (0..nodes).map(move |n| {
        let mut coords = vec![0.0; inputs as usize];
        let mut rest = n;
        for c in coords.iter_mut().rev() {
            *c = (rest % grid as usize) as f64 / (grid - 1) as f64;
            rest /= grid as usize;
        }
        coords
    })
}

/// lut8 with identity matrix and tables, CLUT node values from `node`
pub fn lut8(grid: u8, node: impl Fn(&[f64]) -> Vec<f64>) -> Vec<u8> {
    let mut data = type_header(b"mft1");
    data.extend([3, 3, grid, 0]);
    for row in 0..3 {
        for col in 0..3 {
            data.extend(s15(if row == col { 1.0 } else { 0.0 }));
        }
    }
    let identity_table: Vec<u8> = (0..=255u8).collect();
    for _ in 0..3 {
        data.extend(&identity_table);
    }
    for coords in grid_nodes(3, grid) {
        let values = node(&coords);
        assert_eq!(values.len(), 3);
        for v in values {
            data.push((v.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    }
    for _ in 0..3 {
        data.extend(&identity_table);
    }
    data
}

/// lutBToA: identity B curves, optional matrix (zero offset), an identity
/// 16-bit CLUT on a 2-point grid and `a_curve` on every device channel
pub fn mba(matrix: Option<[[f64; 3]; 3]>, a_curve: Vec<u8>) -> Vec<u8> {
    fn pad4(data: &mut Vec<u8>) {
        while data.len() % 4 != 0 {
            data.push(0);
        }
    }

    let mut body = Vec::new();
    let header_len = 32;

    let b_offset = header_len + body.len();
    for _ in 0..3 {
        body.extend(curv(&[]));
        pad4(&mut body);
    }

    let matrix_offset = match matrix {
        Some(m) => {
            let offset = header_len + body.len();
            for row in m {
                for v in row {
                    body.extend(s15(v));
                }
            }
            for _ in 0..3 {
                body.extend(s15(0.0));
            }
            offset
        }
        None => 0,
    };

    let clut_offset = header_len + body.len();
    let mut grid = [0u8; 16];
    grid[..3].copy_from_slice(&[2, 2, 2]);
    body.extend(grid);
    body.extend([2, 0, 0, 0]);
    for coords in grid_nodes(3, 2) {
        for v in coords {
            body.extend(((v * 65535.0).round() as u16).to_be_bytes());
        }
    }
    pad4(&mut body);

    let a_offset = header_len + body.len();
    for _ in 0..3 {
        body.extend(&a_curve);
        pad4(&mut body);
    }

    let mut data = type_header(b"mBA ");
    data.extend([3, 3, 0, 0]);
    for offset in [b_offset, matrix_offset, 0, clut_offset, a_offset] {
        data.extend((offset as u32).to_be_bytes());
    }
    data.extend(body);
    data
}

/// multiProcessElements holding one matrix element
pub fn mpet_matrix(matrix: [[f32; 3]; 3], offset: [f32; 3]) -> Vec<u8> {
    let mut element = type_header(b"matf");
    element.extend(3u16.to_be_bytes());
    element.extend(3u16.to_be_bytes());
    // Coefficients are stored input-major: e[i * outputs + o]
    for i in 0..3 {
        for row in &matrix {
            element.extend(row[i].to_be_bytes());
        }
    }
    for o in offset {
        element.extend(o.to_be_bytes());
    }

    let mut data = type_header(b"mpet");
    data.extend(3u16.to_be_bytes());
    data.extend(3u16.to_be_bytes());
    data.extend(1u32.to_be_bytes());
    data.extend(24u32.to_be_bytes());
    data.extend((element.len() as u32).to_be_bytes());
    data.extend(element);
    data
}

/// Profile header fields plus a list of tags
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    class: [u8; 4],
    color_space: [u8; 4],
    pcs: [u8; 4],
    intent: u32,
    illuminant: [f64; 3],
    tags: Vec<([u8; 4], Vec<u8>)>,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileBuilder {
    /// RGB display profile with an XYZ PCS and no tags
    pub fn new() -> Self {
        Self {
            class: *b"mntr",
            color_space: *b"RGB ",
            pcs: *b"XYZ ",
            intent: 0,
            illuminant: D50,
            tags: Vec::new(),
        }
    }

    pub fn class(mut self, class: &[u8; 4]) -> Self {
        self.class = *class;
        self
    }

    pub fn pcs(mut self, pcs: &[u8; 4]) -> Self {
        self.pcs = *pcs;
        self
    }

    pub fn intent(mut self, intent: u32) -> Self {
        self.intent = intent;
        self
    }

    pub fn illuminant(mut self, illuminant: [f64; 3]) -> Self {
        self.illuminant = illuminant;
        self
    }

    pub fn tag(mut self, sig: &[u8; 4], payload: Vec<u8>) -> Self {
        self.tags.push((*sig, payload));
        self
    }

    /// Drop every tag with this signature
    pub fn without(mut self, sig: &[u8; 4]) -> Self {
        self.tags.retain(|(s, _)| s != sig);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let table_len = 4 + 12 * self.tags.len();
        let mut offset = 128 + table_len;
        let mut table = (self.tags.len() as u32).to_be_bytes().to_vec();
        let mut body = Vec::new();
        for (sig, payload) in &self.tags {
            table.extend(sig);
            table.extend((offset as u32).to_be_bytes());
            table.extend((payload.len() as u32).to_be_bytes());
            body.extend(payload);
            let padding = (4 - payload.len() % 4) % 4;
            body.extend(std::iter::repeat_n(0u8, padding));
            offset += payload.len() + padding;
        }

        let mut header = vec![0u8; 128];
        header[0..4].copy_from_slice(&(offset as u32).to_be_bytes());
        header[8..12].copy_from_slice(&0x0430_0000u32.to_be_bytes());
        header[12..16].copy_from_slice(&self.class);
        header[16..20].copy_from_slice(&self.color_space);
        header[20..24].copy_from_slice(&self.pcs);
        // Creation date 2024-01-01 00:00:00
        for (i, v) in [2024u16, 1, 1, 0, 0, 0].iter().enumerate() {
            header[24 + 2 * i..26 + 2 * i].copy_from_slice(&v.to_be_bytes());
        }
        header[36..40].copy_from_slice(b"acsp");
        header[64..68].copy_from_slice(&self.intent.to_be_bytes());
        for (i, c) in self.illuminant.iter().enumerate() {
            header[68 + 4 * i..72 + 4 * i].copy_from_slice(&s15(*c));
        }

        let mut data = header;
        data.extend(table);
        data.extend(body);
        data
    }
}

/// Matrix/TRC display profile with sRGB primaries and sRGB tone curves
pub fn srgb_display() -> ProfileBuilder {
    ProfileBuilder::new()
        .tag(b"desc", desc("sRGB-like display"))
        .tag(b"wtpt", xyz(D50))
        .tag(b"rXYZ", xyz(SRGB_D50_COLORANTS[0]))
        .tag(b"gXYZ", xyz(SRGB_D50_COLORANTS[1]))
        .tag(b"bXYZ", xyz(SRGB_D50_COLORANTS[2]))
        .tag(b"rTRC", para_srgb())
        .tag(b"gTRC", para_srgb())
        .tag(b"bTRC", para_srgb())
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
