//! Curve Tag Types
//!
//! - `curv`: identity, a single gamma, or a sampled table
//! - `para`: one of the five parametric functions
//!
//! Both evaluate forward (device → linear) and inverse (linear → device)
//! through [`CurveEval`].

use crate::icc::error::IccError;
use crate::icc::reader::ByteCursor;
use crate::icc::signatures::TypeSignature;
use crate::icc::types::U8Fixed8;
use crate::math::gamma::{FunctionType, ParametricFunction};

/// Forward and inverse evaluation of a one-dimensional curve over `[0, 1]`.
pub trait CurveEval {
    fn eval(&self, x: f64) -> f64;
    fn eval_inverse(&self, y: f64) -> f64;
}

/// Sampled curve (curv type)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Curve {
    samples: Vec<u16>,
}

impl Curve {
    pub fn new(samples: Vec<u16>) -> Self {
        Self { samples }
    }

    /// Parse the body that follows the type signature and reserved bytes.
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let count = cursor.read_u32()? as usize;
        Ok(Self::new(cursor.read_u16_vec(count)?))
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    pub fn is_identity(&self) -> bool {
        self.samples.is_empty()
    }

    /// Exponent of a single-entry curve
    pub fn gamma(&self) -> Option<f64> {
        match self.samples.as_slice() {
            [g] => Some(U8Fixed8(*g).to_f64()),
            _ => None,
        }
    }
}

fn interpolate_table(table: &[u16], x: f64) -> f64 {
    let last = table.len() - 1;
    let pos = x.clamp(0.0, 1.0) * last as f64;
    let lo = (pos.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    debug_assert!(hi - lo <= 1);
    let t = pos - lo as f64;
    let a = table[lo] as f64;
    let b = table[hi] as f64;
    (a + (b - a) * t) / 65535.0
}

/// Nearest sample (first wins on ties), then interpolate towards the
/// neighbour on the other side of the target.
fn invert_table(table: &[u16], y: f64) -> f64 {
    let last = table.len() - 1;
    let target = y.clamp(0.0, 1.0) * 65535.0;

    let mut nearest = 0;
    let mut best = f64::INFINITY;
    for (i, &v) in table.iter().enumerate() {
        let dist = (v as f64 - target).abs();
        if dist < best {
            best = dist;
            nearest = i;
        }
    }

    let at = table[nearest] as f64;
    let neighbours = [nearest.checked_sub(1), (nearest < last).then_some(nearest + 1)];
    for j in neighbours.into_iter().flatten() {
        let other = table[j] as f64;
        if other != at && (other - target) * (at - target) <= 0.0 {
            let t = (target - at) / (other - at);
            let x = nearest as f64 + t * (j as f64 - nearest as f64);
            return x / last as f64;
        }
    }
    nearest as f64 / last as f64
}

impl CurveEval for Curve {
    fn eval(&self, x: f64) -> f64 {
        match self.samples.as_slice() {
            [] => x,
            [g] => x.max(0.0).powf(U8Fixed8(*g).to_f64()),
            table => interpolate_table(table, x),
        }
    }

    fn eval_inverse(&self, y: f64) -> f64 {
        match self.samples.as_slice() {
            [] => y,
            [g] => {
                let gamma = U8Fixed8(*g).to_f64();
                if gamma > 0.0 {
                    y.max(0.0).powf(1.0 / gamma)
                } else {
                    y
                }
            }
            table => invert_table(table, y),
        }
    }
}

/// Parametric curve (para type)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricCurve {
    pub function: ParametricFunction,
}

impl ParametricCurve {
    pub fn new(function: ParametricFunction) -> Self {
        Self { function }
    }

    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self, IccError> {
        let raw_type = cursor.read_u16()?;
        cursor.skip(2)?;
        let function_type = FunctionType::from_icc(raw_type).ok_or_else(|| {
            IccError::malformed(
                TypeSignature::PARAMETRIC_CURVE,
                format!("unknown function type {raw_type}"),
            )
        })?;

        let count = function_type.param_count();
        cursor.ensure_records(count, 4)?;
        let params = (0..count)
            .map(|_| cursor.read_s15fixed16().map(|v| v.to_f64()))
            .collect::<Result<Vec<_>, _>>()?;

        let function = ParametricFunction::from_params(function_type, &params).ok_or_else(|| {
            IccError::malformed(TypeSignature::PARAMETRIC_CURVE, "missing parameters")
        })?;
        Ok(Self { function })
    }
}

impl CurveEval for ParametricCurve {
    fn eval(&self, x: f64) -> f64 {
        self.function.eval(x)
    }

    fn eval_inverse(&self, y: f64) -> f64 {
        self.function.eval_inverse(y)
    }
}

/// A curve embedded in a LUT stage: either kind, each with its own type
/// signature.
#[derive(Debug, Clone, PartialEq)]
pub enum StageCurve {
    Sampled(Curve),
    Parametric(ParametricCurve),
}

impl StageCurve {
    /// Parse a complete curve element (signature, reserved, body) at the
    /// cursor position, leaving the cursor 4-byte aligned after it.
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>, owner: TypeSignature) -> Result<Self, IccError> {
        let sig = TypeSignature(cursor.read_u32()?);
        cursor.skip(4)?;
        let curve = match sig {
            TypeSignature::CURVE => Self::Sampled(Curve::parse(cursor)?),
            TypeSignature::PARAMETRIC_CURVE => Self::Parametric(ParametricCurve::parse(cursor)?),
            other => {
                return Err(IccError::malformed(
                    owner,
                    format!("curve stage holds '{other}'"),
                ));
            }
        };
        cursor.align4();
        Ok(curve)
    }

    /// Parse `count` consecutive curves starting at `offset`.
    pub(crate) fn parse_set(
        cursor: &mut ByteCursor<'_>,
        offset: usize,
        count: usize,
        owner: TypeSignature,
    ) -> Result<Vec<Self>, IccError> {
        cursor.seek(offset)?;
        (0..count).map(|_| Self::parse(cursor, owner)).collect()
    }
}

impl CurveEval for StageCurve {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Sampled(c) => c.eval(x),
            Self::Parametric(c) => c.eval(x),
        }
    }

    fn eval_inverse(&self, y: f64) -> f64 {
        match self {
            Self::Sampled(c) => c.eval_inverse(y),
            Self::Parametric(c) => c.eval_inverse(y),
        }
    }
}
