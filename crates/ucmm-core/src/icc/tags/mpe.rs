//! multiProcessElementsType (mpet)
//!
//! A chain of float-valued processing elements, used by the D2Bx and B2Dx
//! tags. Each element begins with its own signature, a reserved word, and
//! its input and output channel counts.

use crate::icc::error::IccError;
use crate::icc::reader::ByteCursor;
use crate::icc::signatures::TypeSignature;
use crate::math::interpolation::multilinear;

use super::lut::{MAX_CLUT_INPUTS, clut_entry_count};

const MPET: TypeSignature = TypeSignature::MULTI_PROCESS_ELEMENTS;

/// multiProcessElementsType
#[derive(Debug, Clone, PartialEq)]
pub struct MultiProcessElements {
    pub input_channels: u16,
    pub output_channels: u16,
    pub elements: Vec<ProcessElement>,
}

impl MultiProcessElements {
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let input_channels = cursor.read_u16()?;
        let output_channels = cursor.read_u16()?;
        let count = cursor.read_u32()? as usize;
        cursor.ensure_records(count, 8)?;

        let mut positions = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = cursor.read_u32()? as usize;
            let size = cursor.read_u32()? as usize;
            positions.push((offset, size));
        }

        let mut elements = Vec::with_capacity(count);
        let mut channels = input_channels;
        for (offset, size) in positions {
            if offset.checked_add(size).is_none_or(|end| end > cursor.len()) {
                return Err(IccError::malformed(
                    MPET,
                    format!("element at {offset}+{size} exceeds payload"),
                ));
            }
            cursor.seek(offset)?;
            let element = ProcessElement::parse(cursor, offset)?;
            if element.input_channels() != channels {
                return Err(IccError::malformed(
                    MPET,
                    format!(
                        "element expects {} channels, previous stage gives {channels}",
                        element.input_channels()
                    ),
                ));
            }
            channels = element.output_channels();
            elements.push(element);
        }
        if channels != output_channels {
            return Err(IccError::malformed(
                MPET,
                format!("chain ends with {channels} channels, declared {output_channels}"),
            ));
        }

        Ok(Self {
            input_channels,
            output_channels,
            elements,
        })
    }

    /// Run `input` through every element in order.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        self.elements
            .iter()
            .fold(input.to_vec(), |values, element| element.apply(&values))
    }
}

/// One processing element
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessElement {
    CurveSet(CurveSetElement),
    Matrix(MatrixElement),
    Clut(ClutElement),
    /// bACS, eACS and unrecognized elements; evaluated as a pass-through
    Future(FutureElement),
}

impl ProcessElement {
    /// Parse the element whose signature starts at `start`.
    fn parse(cursor: &mut ByteCursor<'_>, start: usize) -> Result<Self, IccError> {
        let signature = TypeSignature(cursor.read_u32()?);
        cursor.skip(4)?;
        let inputs = cursor.read_u16()?;
        let outputs = cursor.read_u16()?;

        let element = match signature {
            TypeSignature::CURVE_SET_ELEMENT => {
                Self::CurveSet(CurveSetElement::parse(cursor, start, inputs, outputs)?)
            }
            TypeSignature::MATRIX_ELEMENT => {
                Self::Matrix(MatrixElement::parse(cursor, inputs, outputs)?)
            }
            TypeSignature::CLUT_ELEMENT => Self::Clut(ClutElement::parse(cursor, inputs, outputs)?),
            _ => Self::Future(FutureElement {
                signature,
                input_channels: inputs,
                output_channels: outputs,
            }),
        };
        Ok(element)
    }

    pub fn input_channels(&self) -> u16 {
        match self {
            Self::CurveSet(e) => e.curves.len() as u16,
            Self::Matrix(e) => e.input_channels,
            Self::Clut(e) => e.grid_points.len() as u16,
            Self::Future(e) => e.input_channels,
        }
    }

    pub fn output_channels(&self) -> u16 {
        match self {
            Self::CurveSet(e) => e.curves.len() as u16,
            Self::Matrix(e) => e.output_channels,
            Self::Clut(e) => e.output_channels,
            Self::Future(e) => e.output_channels,
        }
    }

    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        match self {
            Self::CurveSet(e) => e.apply(input),
            Self::Matrix(e) => e.apply(input),
            Self::Clut(e) => e.apply(input),
            Self::Future(e) => (0..e.output_channels as usize)
                .map(|i| input.get(i).copied().unwrap_or(0.0))
                .collect(),
        }
    }
}

/// Element kept by signature only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FutureElement {
    pub signature: TypeSignature,
    pub input_channels: u16,
    pub output_channels: u16,
}

/// cvst: one segmented curve per channel
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSetElement {
    pub curves: Vec<SegmentedCurve>,
}

impl CurveSetElement {
    fn parse(
        cursor: &mut ByteCursor<'_>,
        start: usize,
        inputs: u16,
        outputs: u16,
    ) -> Result<Self, IccError> {
        if inputs != outputs {
            return Err(IccError::malformed(
                MPET,
                format!("curve set maps {inputs} channels to {outputs}"),
            ));
        }
        let count = inputs as usize;
        cursor.ensure_records(count, 8)?;
        let mut offsets = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = cursor.read_u32()? as usize;
            cursor.skip(4)?;
            offsets.push(offset);
        }

        let curves = offsets
            .into_iter()
            .map(|offset| {
                let at = start
                    .checked_add(offset)
                    .ok_or_else(|| IccError::malformed(MPET, "curve offset overflows"))?;
                cursor.seek(at)?;
                SegmentedCurve::parse(cursor)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { curves })
    }

    fn apply(&self, input: &[f64]) -> Vec<f64> {
        self.curves
            .iter()
            .enumerate()
            .map(|(i, curve)| curve.eval(input.get(i).copied().unwrap_or(0.0) as f32) as f64)
            .collect()
    }
}

/// Formula segment functions (parf)
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentFormula {
    /// Y = (a·X + b)^γ + c
    Power { gamma: f32, a: f32, b: f32, c: f32 },
    /// Y = a·log10(b·X^γ + c) + d
    Log {
        gamma: f32,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
    },
    /// Y = a·b^(c·X + d) + e
    Exp { a: f32, b: f32, c: f32, d: f32, e: f32 },
}

impl SegmentFormula {
    fn eval(&self, x: f32) -> f32 {
        match *self {
            Self::Power { gamma, a, b, c } => (a * x + b).powf(gamma) + c,
            Self::Log { gamma, a, b, c, d } => a * (b * x.powf(gamma) + c).log10() + d,
            Self::Exp { a, b, c, d, e } => a * b.powf(c * x + d) + e,
        }
    }
}

/// One piece of a segmented curve
#[derive(Debug, Clone, PartialEq)]
pub enum CurveSegment {
    Formula(SegmentFormula),
    /// Samples spaced evenly up to the segment's end breakpoint; the value
    /// at its start breakpoint comes from the preceding segment
    Sampled { samples: Vec<f32>, start_value: f32 },
}

/// curf: piecewise curve split at breakpoints
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedCurve {
    pub breakpoints: Vec<f32>,
    pub segments: Vec<CurveSegment>,
}

impl SegmentedCurve {
    fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let sig = TypeSignature(cursor.read_u32()?);
        if sig != TypeSignature::SEGMENTED_CURVE {
            return Err(IccError::malformed(MPET, format!("expected 'curf', found '{sig}'")));
        }
        cursor.skip(4)?;
        let count = cursor.read_u16()? as usize;
        cursor.skip(2)?;
        if count == 0 {
            return Err(IccError::malformed(MPET, "segmented curve without segments"));
        }
        let breakpoints = cursor.read_f32_vec(count - 1)?;

        let mut segments: Vec<CurveSegment> = Vec::with_capacity(count);
        for i in 0..count {
            let sig = TypeSignature(cursor.read_u32()?);
            cursor.skip(4)?;
            let segment = match sig {
                TypeSignature::FORMULA_SEGMENT => CurveSegment::Formula(parse_formula(cursor)?),
                TypeSignature::SAMPLED_SEGMENT => {
                    if i == 0 || i == count - 1 {
                        return Err(IccError::malformed(
                            MPET,
                            "sampled segment cannot be unbounded",
                        ));
                    }
                    let n = cursor.read_u32()? as usize;
                    let samples = cursor.read_f32_vec(n)?;
                    if samples.is_empty() {
                        return Err(IccError::malformed(MPET, "empty sampled segment"));
                    }
                    let start_value = eval_segment(&breakpoints, &segments, i - 1, breakpoints[i - 1]);
                    CurveSegment::Sampled {
                        samples,
                        start_value,
                    }
                }
                other => {
                    return Err(IccError::malformed(MPET, format!("unknown segment '{other}'")));
                }
            };
            segments.push(segment);
        }

        Ok(Self {
            breakpoints,
            segments,
        })
    }

    pub fn eval(&self, x: f32) -> f32 {
        let index = self
            .breakpoints
            .iter()
            .position(|&b| x <= b)
            .unwrap_or(self.breakpoints.len());
        eval_segment(&self.breakpoints, &self.segments, index, x)
    }
}

fn parse_formula(cursor: &mut ByteCursor<'_>) -> Result<SegmentFormula, IccError> {
    let function = cursor.read_u16()?;
    cursor.skip(2)?;
    let formula = match function {
        0 => {
            let p = cursor.read_f32_vec(4)?;
            SegmentFormula::Power {
                gamma: p[0],
                a: p[1],
                b: p[2],
                c: p[3],
            }
        }
        1 => {
            let p = cursor.read_f32_vec(5)?;
            SegmentFormula::Log {
                gamma: p[0],
                a: p[1],
                b: p[2],
                c: p[3],
                d: p[4],
            }
        }
        2 => {
            let p = cursor.read_f32_vec(5)?;
            SegmentFormula::Exp {
                a: p[0],
                b: p[1],
                c: p[2],
                d: p[3],
                e: p[4],
            }
        }
        other => {
            return Err(IccError::malformed(MPET, format!("formula type {other}")));
        }
    };
    Ok(formula)
}

fn eval_segment(breakpoints: &[f32], segments: &[CurveSegment], index: usize, x: f32) -> f32 {
    match &segments[index] {
        CurveSegment::Formula(formula) => formula.eval(x),
        CurveSegment::Sampled {
            samples,
            start_value,
        } => {
            let start = breakpoints[index - 1];
            let end = breakpoints[index];
            let n = samples.len();
            let span = end - start;
            let pos = if span > 0.0 {
                ((x - start) / span * n as f32).clamp(0.0, n as f32)
            } else {
                n as f32
            };
            let k = (pos.floor() as usize).min(n - 1);
            let t = pos - k as f32;
            let lo = if k == 0 { *start_value } else { samples[k - 1] };
            lo + (samples[k] - lo) * t
        }
    }
}

/// matf: `out[o] = Σ in[i]·e[i·outputs + o] + offset[o]`
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixElement {
    pub input_channels: u16,
    pub output_channels: u16,
    pub coefficients: Vec<f32>,
    pub offsets: Vec<f32>,
}

impl MatrixElement {
    fn parse(cursor: &mut ByteCursor<'_>, inputs: u16, outputs: u16) -> Result<Self, IccError> {
        let coefficients = cursor.read_f32_vec(inputs as usize * outputs as usize)?;
        let offsets = cursor.read_f32_vec(outputs as usize)?;
        Ok(Self {
            input_channels: inputs,
            output_channels: outputs,
            coefficients,
            offsets,
        })
    }

    fn apply(&self, input: &[f64]) -> Vec<f64> {
        let outputs = self.output_channels as usize;
        (0..outputs)
            .map(|o| {
                let sum: f64 = (0..self.input_channels as usize)
                    .map(|i| {
                        input.get(i).copied().unwrap_or(0.0) * self.coefficients[i * outputs + o] as f64
                    })
                    .sum();
                sum + self.offsets[o] as f64
            })
            .collect()
    }
}

/// clut: float CLUT with per-dimension grid sizes
#[derive(Debug, Clone, PartialEq)]
pub struct ClutElement {
    pub grid_points: Vec<u8>,
    pub output_channels: u16,
    pub values: Vec<f32>,
}

impl ClutElement {
    fn parse(cursor: &mut ByteCursor<'_>, inputs: u16, outputs: u16) -> Result<Self, IccError> {
        if inputs == 0 || inputs as usize > MAX_CLUT_INPUTS {
            return Err(IccError::malformed(MPET, format!("CLUT with {inputs} inputs")));
        }
        let grid_points = cursor.take(MAX_CLUT_INPUTS)?[..inputs as usize].to_vec();
        if grid_points.contains(&0) {
            return Err(IccError::malformed(MPET, "zero CLUT grid points"));
        }
        let count = clut_entry_count(grid_points.iter().map(|&g| g as usize), outputs as usize)
            .ok_or_else(|| IccError::malformed(MPET, "CLUT size overflows"))?;
        let values = cursor.read_f32_vec(count)?;
        Ok(Self {
            grid_points,
            output_channels: outputs,
            values,
        })
    }

    fn apply(&self, input: &[f64]) -> Vec<f64> {
        let grid: Vec<usize> = self.grid_points.iter().map(|&g| g as usize).collect();
        multilinear(&grid, self.output_channels as usize, input, |i| self.values[i] as f64)
    }
}
