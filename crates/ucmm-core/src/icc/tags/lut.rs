//! LUT Tag Types
//!
//! - mft1 (lut8Type) and mft2 (lut16Type): matrix, input tables, CLUT, output tables
//! - mAB (lutAToBType) and mBA (lutBToAType): offset-addressed A/M/B curve
//!   sets, an optional matrix with offsets and an optional CLUT
//!
//! See ICC.1:2010 sections 10.8 through 10.11.

use crate::icc::error::IccError;
use crate::icc::reader::ByteCursor;
use crate::icc::signatures::TypeSignature;

use crate::math::interpolation::{multilinear, table_lookup};

use super::curves::{CurveEval, StageCurve};

/// Maximum number of CLUT input dimensions
pub const MAX_CLUT_INPUTS: usize = 16;

/// Number of CLUT entries: `outputs × Π grid`, or `None` on overflow.
pub fn clut_entry_count(grid: impl IntoIterator<Item = usize>, outputs: usize) -> Option<usize> {
    grid.into_iter()
        .try_fold(outputs, |acc, points| acc.checked_mul(points))
}

fn read_matrix3(cursor: &mut ByteCursor<'_>) -> Result<[[f64; 3]; 3], IccError> {
    let mut matrix = [[0.0f64; 3]; 3];
    for row in matrix.iter_mut() {
        for value in row.iter_mut() {
            *value = cursor.read_s15fixed16()?.to_f64();
        }
    }
    Ok(matrix)
}

fn check_channels(type_sig: TypeSignature, inputs: u8, outputs: u8) -> Result<(), IccError> {
    if inputs == 0 || outputs == 0 || inputs as usize > MAX_CLUT_INPUTS {
        return Err(IccError::malformed(
            type_sig,
            format!("unsupported channel counts {inputs} -> {outputs}"),
        ));
    }
    Ok(())
}

fn uniform_clut_len(
    type_sig: TypeSignature,
    grid_points: u8,
    inputs: u8,
    outputs: u8,
) -> Result<usize, IccError> {
    if grid_points == 0 {
        return Err(IccError::malformed(type_sig, "zero CLUT grid points"));
    }
    clut_entry_count(
        std::iter::repeat_n(grid_points as usize, inputs as usize),
        outputs as usize,
    )
    .ok_or_else(|| IccError::malformed(type_sig, "CLUT size overflows"))
}

/// Table and CLUT sample of a lut8/lut16
trait LutSample: Copy {
    const SCALE: f64;

    fn normalized(self) -> f64;
}

impl LutSample for u8 {
    const SCALE: f64 = 255.0;

    fn normalized(self) -> f64 {
        self as f64 / Self::SCALE
    }
}

impl LutSample for u16 {
    const SCALE: f64 = 65535.0;

    fn normalized(self) -> f64 {
        self as f64 / Self::SCALE
    }
}

/// Input padded or cut to `channels` values
fn take_channels(input: &[f64], channels: u8) -> Vec<f64> {
    let mut v: Vec<f64> = input.iter().take(channels as usize).copied().collect();
    v.resize(channels as usize, 0.0);
    v
}

fn apply_tables<T: LutSample>(values: &mut [f64], tables: &[Vec<T>]) {
    for (x, table) in values.iter_mut().zip(tables) {
        *x = table_lookup(table.len(), *x, |i| table[i].normalized());
    }
}

fn apply_curves(values: &mut [f64], curves: Option<&Vec<StageCurve>>) {
    for (x, curve) in values.iter_mut().zip(curves.into_iter().flatten()) {
        *x = curve.eval(*x);
    }
}

/// Matrix → input tables → CLUT → output tables, shared by lut8 and lut16.
/// The matrix only applies to three-channel input.
fn eval_legacy_lut<T: LutSample>(
    matrix: &[[f64; 3]; 3],
    input_tables: &[Vec<T>],
    grid_points: u8,
    output_channels: u8,
    clut: &[T],
    output_tables: &[Vec<T>],
    input: &[f64],
) -> Vec<f64> {
    let mut v = take_channels(input, input_tables.len() as u8);
    if let [x, y, z] = v[..] {
        for (row, out) in matrix.iter().zip(v.iter_mut()) {
            *out = (row[0] * x + row[1] * y + row[2] * z).clamp(0.0, 1.0);
        }
    }
    apply_tables(&mut v, input_tables);

    let grid = vec![grid_points as usize; v.len()];
    let mut out = multilinear(&grid, output_channels as usize, &v, |i| {
        clut.get(i).map_or(0.0, |s| s.normalized())
    });
    apply_tables(&mut out, output_tables);
    out
}

/// 8-bit LUT (mft1 / lut8Type)
#[derive(Debug, Clone, PartialEq)]
pub struct Lut8 {
    pub input_channels: u8,
    pub output_channels: u8,
    /// Grid points along every input dimension
    pub grid_points: u8,
    /// 3x3 matrix, row-major; used only with an XYZ input space
    pub matrix: [[f64; 3]; 3],
    /// 256 entries per input channel
    pub input_tables: Vec<Vec<u8>>,
    pub clut: Vec<u8>,
    /// 256 entries per output channel
    pub output_tables: Vec<Vec<u8>>,
}

impl Lut8 {
    pub const TABLE_ENTRIES: usize = 256;

    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let input_channels = cursor.read_u8()?;
        let output_channels = cursor.read_u8()?;
        let grid_points = cursor.read_u8()?;
        cursor.skip(1)?;
        check_channels(TypeSignature::LUT8, input_channels, output_channels)?;
        let matrix = read_matrix3(cursor)?;

        let input_tables = (0..input_channels)
            .map(|_| cursor.take(Self::TABLE_ENTRIES).map(<[u8]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;

        let clut_len =
            uniform_clut_len(TypeSignature::LUT8, grid_points, input_channels, output_channels)?;
        let clut = cursor.take(clut_len)?.to_vec();

        let output_tables = (0..output_channels)
            .map(|_| cursor.take(Self::TABLE_ENTRIES).map(<[u8]>::to_vec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            input_channels,
            output_channels,
            grid_points,
            matrix,
            input_tables,
            clut,
            output_tables,
        })
    }
}

impl Lut8 {
    /// Evaluate on normalized input, one value per input channel
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        eval_legacy_lut(
            &self.matrix,
            &self.input_tables,
            self.grid_points,
            self.output_channels,
            &self.clut,
            &self.output_tables,
            input,
        )
    }
}

/// 16-bit LUT (mft2 / lut16Type)
#[derive(Debug, Clone, PartialEq)]
pub struct Lut16 {
    pub input_channels: u8,
    pub output_channels: u8,
    pub grid_points: u8,
    pub matrix: [[f64; 3]; 3],
    pub input_entries: u16,
    pub output_entries: u16,
    pub input_tables: Vec<Vec<u16>>,
    pub clut: Vec<u16>,
    pub output_tables: Vec<Vec<u16>>,
}

impl Lut16 {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let input_channels = cursor.read_u8()?;
        let output_channels = cursor.read_u8()?;
        let grid_points = cursor.read_u8()?;
        cursor.skip(1)?;
        check_channels(TypeSignature::LUT16, input_channels, output_channels)?;
        let matrix = read_matrix3(cursor)?;

        let input_entries = cursor.read_u16()?;
        let output_entries = cursor.read_u16()?;
        if input_entries < 2 || output_entries < 2 {
            return Err(IccError::malformed(
                TypeSignature::LUT16,
                format!("table sizes {input_entries}/{output_entries} below 2"),
            ));
        }

        let input_tables = (0..input_channels)
            .map(|_| cursor.read_u16_vec(input_entries as usize))
            .collect::<Result<Vec<_>, _>>()?;

        let clut_len =
            uniform_clut_len(TypeSignature::LUT16, grid_points, input_channels, output_channels)?;
        let clut = cursor.read_u16_vec(clut_len)?;

        let output_tables = (0..output_channels)
            .map(|_| cursor.read_u16_vec(output_entries as usize))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            input_channels,
            output_channels,
            grid_points,
            matrix,
            input_entries,
            output_entries,
            input_tables,
            clut,
            output_tables,
        })
    }
}

impl Lut16 {
    /// Evaluate on normalized input, one value per input channel
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        eval_legacy_lut(
            &self.matrix,
            &self.input_tables,
            self.grid_points,
            self.output_channels,
            &self.clut,
            &self.output_tables,
            input,
        )
    }
}

/// Direction of a lutAToBType / lutBToAType payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutDirection {
    /// mAB: A curves → CLUT → M curves → matrix → B curves
    AToB,
    /// mBA: B curves → matrix → M curves → CLUT → A curves
    BToA,
}

impl LutDirection {
    fn type_signature(self) -> TypeSignature {
        match self {
            Self::AToB => TypeSignature::LUT_A_TO_B,
            Self::BToA => TypeSignature::LUT_B_TO_A,
        }
    }
}

/// Matrix stage of an mAB/mBA LUT: 3x3 row-major plus an offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutMatrix {
    pub matrix: [[f64; 3]; 3],
    pub offset: [f64; 3],
}

impl LutMatrix {
    fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let matrix = read_matrix3(cursor)?;
        let mut offset = [0.0f64; 3];
        for value in offset.iter_mut() {
            *value = cursor.read_s15fixed16()?.to_f64();
        }
        Ok(Self { matrix, offset })
    }

    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        std::array::from_fn(|row| {
            m[row][0] * v[0] + m[row][1] * v[1] + m[row][2] * v[2] + self.offset[row]
        })
    }
}

/// CLUT sample storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClutValues {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl ClutValues {
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` normalized to `[0, 1]`
    pub fn normalized(&self, index: usize) -> f64 {
        match self {
            Self::U8(v) => v[index] as f64 / 255.0,
            Self::U16(v) => v[index] as f64 / 65535.0,
        }
    }
}

/// CLUT stage of an mAB/mBA LUT with per-dimension grid sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clut {
    pub grid_points: Vec<u8>,
    pub output_channels: u8,
    pub values: ClutValues,
}

impl Clut {
    fn parse(
        cursor: &mut ByteCursor<'_>,
        type_sig: TypeSignature,
        inputs: u8,
        outputs: u8,
    ) -> Result<Self, IccError> {
        let grid_bytes = cursor.take(MAX_CLUT_INPUTS)?;
        let grid_points = grid_bytes[..inputs as usize].to_vec();
        if grid_points.contains(&0) {
            return Err(IccError::malformed(type_sig, "zero CLUT grid points"));
        }
        let precision = cursor.read_u8()?;
        cursor.skip(3)?;

        let count = clut_entry_count(grid_points.iter().map(|&g| g as usize), outputs as usize)
            .ok_or_else(|| IccError::malformed(type_sig, "CLUT size overflows"))?;
        let values = match precision {
            1 => ClutValues::U8(cursor.take(count)?.to_vec()),
            2 => ClutValues::U16(cursor.read_u16_vec(count)?),
            other => {
                return Err(IccError::malformed(
                    type_sig,
                    format!("CLUT precision {other}"),
                ));
            }
        };

        Ok(Self {
            grid_points,
            output_channels: outputs,
            values,
        })
    }

    /// N-linear interpolation at `input`
    pub fn eval(&self, input: &[f64]) -> Vec<f64> {
        let grid: Vec<usize> = self.grid_points.iter().map(|&g| g as usize).collect();
        let len = self.values.len();
        multilinear(&grid, self.output_channels as usize, input, |i| {
            if i < len { self.values.normalized(i) } else { 0.0 }
        })
    }
}

/// lutAToBType / lutBToAType
#[derive(Debug, Clone, PartialEq)]
pub struct LutAB {
    pub direction: LutDirection,
    pub input_channels: u8,
    pub output_channels: u8,
    pub b_curves: Option<Vec<StageCurve>>,
    pub matrix: Option<LutMatrix>,
    pub m_curves: Option<Vec<StageCurve>>,
    pub clut: Option<Clut>,
    pub a_curves: Option<Vec<StageCurve>>,
}

impl LutAB {
    pub(crate) fn parse(
        cursor: &mut ByteCursor<'_>,
        direction: LutDirection,
    ) -> Result<Self, IccError> {
        let type_sig = direction.type_signature();
        let input_channels = cursor.read_u8()?;
        let output_channels = cursor.read_u8()?;
        cursor.skip(2)?;
        check_channels(type_sig, input_channels, output_channels)?;

        let b_offset = cursor.read_u32()? as usize;
        let matrix_offset = cursor.read_u32()? as usize;
        let m_offset = cursor.read_u32()? as usize;
        let clut_offset = cursor.read_u32()? as usize;
        let a_offset = cursor.read_u32()? as usize;

        // B and M curves sit on the PCS side, A curves on the device side
        let (pcs_channels, device_channels) = match direction {
            LutDirection::AToB => (output_channels, input_channels),
            LutDirection::BToA => (input_channels, output_channels),
        };

        let b_curves = (b_offset != 0)
            .then(|| StageCurve::parse_set(cursor, b_offset, pcs_channels as usize, type_sig))
            .transpose()?;
        let matrix = (matrix_offset != 0)
            .then(|| {
                cursor.seek(matrix_offset)?;
                LutMatrix::parse(cursor)
            })
            .transpose()?;
        let m_curves = (m_offset != 0)
            .then(|| StageCurve::parse_set(cursor, m_offset, pcs_channels as usize, type_sig))
            .transpose()?;
        let clut = (clut_offset != 0)
            .then(|| {
                cursor.seek(clut_offset)?;
                Clut::parse(cursor, type_sig, input_channels, output_channels)
            })
            .transpose()?;
        let a_curves = (a_offset != 0)
            .then(|| StageCurve::parse_set(cursor, a_offset, device_channels as usize, type_sig))
            .transpose()?;

        Ok(Self {
            direction,
            input_channels,
            output_channels,
            b_curves,
            matrix,
            m_curves,
            clut,
            a_curves,
        })
    }

    /// Evaluate every present stage in the order of [`Self::direction`].
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let mut v = take_channels(input, self.input_channels);
        match self.direction {
            LutDirection::AToB => {
                apply_curves(&mut v, self.a_curves.as_ref());
                self.apply_clut(&mut v);
                apply_curves(&mut v, self.m_curves.as_ref());
                self.apply_matrix(&mut v);
                apply_curves(&mut v, self.b_curves.as_ref());
            }
            LutDirection::BToA => {
                apply_curves(&mut v, self.b_curves.as_ref());
                self.apply_matrix(&mut v);
                apply_curves(&mut v, self.m_curves.as_ref());
                self.apply_clut(&mut v);
                apply_curves(&mut v, self.a_curves.as_ref());
            }
        }
        v
    }

    fn apply_matrix(&self, v: &mut [f64]) {
        let Some(matrix) = &self.matrix else {
            return;
        };
        if let [x, y, z] = *v {
            for (out, c) in v.iter_mut().zip(matrix.apply([x, y, z])) {
                *out = c.clamp(0.0, 1.0);
            }
        }
    }

    fn apply_clut(&self, v: &mut Vec<f64>) {
        if let Some(clut) = &self.clut {
            *v = clut.eval(v);
        }
    }
}
