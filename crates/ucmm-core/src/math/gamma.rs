//! Transfer functions
//!
//! This module provides:
//! - sRGB companding (IEC 61966-2-1)
//! - pure power gamma
//! - the five ICC parametric function types and their closed-form inverses

/// sRGB gamma decode (encoded → linear)
#[inline]
pub fn srgb_gamma_decode(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma encode (linear → encoded)
#[inline]
pub fn srgb_gamma_encode(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// y = x^gamma, with non-positive input mapped to zero
#[inline]
pub fn gamma_decode(encoded: f64, gamma: f64) -> f64 {
    if encoded <= 0.0 {
        0.0
    } else {
        encoded.powf(gamma)
    }
}

/// y = x^(1/gamma), with non-positive input mapped to zero
#[inline]
pub fn gamma_encode(linear: f64, gamma: f64) -> f64 {
    if linear <= 0.0 || gamma == 0.0 {
        linear.max(0.0)
    } else {
        linear.powf(1.0 / gamma)
    }
}

/// ICC parametric function type (ICC.1:2010 section 10.16)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionType {
    /// Type 0: Y = X^g
    Gamma,
    /// Type 1: Y = (aX + b)^g  if X >= -b/a, else 0
    Cie122,
    /// Type 2: Y = (aX + b)^g + c  if X >= -b/a, else c
    Iec61966_3,
    /// Type 3: Y = (aX + b)^g  if X >= d, else cX
    Iec61966_2_1,
    /// Type 4: Y = (aX + b)^g + e  if X >= d, else cX + f
    Full,
}

impl FunctionType {
    pub fn from_icc(function_type: u16) -> Option<Self> {
        match function_type {
            0 => Some(Self::Gamma),
            1 => Some(Self::Cie122),
            2 => Some(Self::Iec61966_3),
            3 => Some(Self::Iec61966_2_1),
            4 => Some(Self::Full),
            _ => None,
        }
    }

    pub fn to_icc(self) -> u16 {
        match self {
            Self::Gamma => 0,
            Self::Cie122 => 1,
            Self::Iec61966_3 => 2,
            Self::Iec61966_2_1 => 3,
            Self::Full => 4,
        }
    }

    /// Number of s15Fixed16 parameters stored for this type
    pub fn param_count(self) -> usize {
        match self {
            Self::Gamma => 1,
            Self::Cie122 => 3,
            Self::Iec61966_3 => 4,
            Self::Iec61966_2_1 => 5,
            Self::Full => 7,
        }
    }
}

/// One of the ICC parametric functions with its coefficients.
///
/// Unused coefficients keep neutral values (`a = 1`, the rest `0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricFunction {
    pub function_type: FunctionType,
    pub g: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

const EPS: f64 = 1e-10;

impl ParametricFunction {
    /// Type 0 curve
    pub fn gamma(g: f64) -> Self {
        Self {
            function_type: FunctionType::Gamma,
            g,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// The sRGB decoding curve as a type 3 function
    pub fn srgb() -> Self {
        Self {
            function_type: FunctionType::Iec61966_2_1,
            g: 2.4,
            a: 1.0 / 1.055,
            b: 0.055 / 1.055,
            c: 1.0 / 12.92,
            d: 0.04045,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Build from the stored parameter list; `None` if too few are given.
    pub fn from_params(function_type: FunctionType, params: &[f64]) -> Option<Self> {
        if params.len() < function_type.param_count() {
            return None;
        }
        let mut func = Self::gamma(params[0]);
        func.function_type = function_type;
        let mut rest = params[1..function_type.param_count()].iter().copied();
        for slot in [
            &mut func.a,
            &mut func.b,
            &mut func.c,
            &mut func.d,
            &mut func.e,
            &mut func.f,
        ] {
            match rest.next() {
                Some(value) => *slot = value,
                None => break,
            }
        }
        Some(func)
    }

    /// Parameters in storage order (g, a, b, ...)
    pub fn params(&self) -> Vec<f64> {
        [self.g, self.a, self.b, self.c, self.d, self.e, self.f][..self.function_type.param_count()]
            .to_vec()
    }

    /// Input where the power segment starts for types 1 and 2
    fn power_threshold(&self) -> f64 {
        if self.a.abs() > EPS { -self.b / self.a } else { 0.0 }
    }

    fn power(&self, x: f64) -> f64 {
        (self.a * x + self.b).max(0.0).powf(self.g)
    }

    /// Evaluate the function; the result is clamped to `[0, 1]`.
    pub fn eval(&self, x: f64) -> f64 {
        let y = match self.function_type {
            FunctionType::Gamma => x.max(0.0).powf(self.g),
            FunctionType::Cie122 => {
                if x >= self.power_threshold() {
                    self.power(x)
                } else {
                    0.0
                }
            }
            FunctionType::Iec61966_3 => {
                if x >= self.power_threshold() {
                    self.power(x) + self.c
                } else {
                    self.c
                }
            }
            FunctionType::Iec61966_2_1 => {
                if x >= self.d {
                    self.power(x)
                } else {
                    self.c * x
                }
            }
            FunctionType::Full => {
                if x >= self.d {
                    self.power(x) + self.e
                } else {
                    self.c * x + self.f
                }
            }
        };
        y.clamp(0.0, 1.0)
    }

    /// Undo the power segment: X = (Y^(1/g) - b) / a
    fn power_inverse(&self, y: f64) -> f64 {
        if self.a.abs() <= EPS || self.g.abs() <= EPS {
            return y;
        }
        (y.max(0.0).powf(1.0 / self.g) - self.b) / self.a
    }

    /// Algebraic inverse of [`eval`](Self::eval); the result is clamped to `[0, 1]`.
    pub fn eval_inverse(&self, y: f64) -> f64 {
        let y = y.clamp(0.0, 1.0);
        let x = match self.function_type {
            FunctionType::Gamma => {
                if self.g.abs() > EPS {
                    y.powf(1.0 / self.g)
                } else {
                    y
                }
            }
            FunctionType::Cie122 => {
                if y > 0.0 {
                    self.power_inverse(y)
                } else {
                    self.power_threshold()
                }
            }
            FunctionType::Iec61966_3 => {
                if y > self.c {
                    self.power_inverse(y - self.c)
                } else {
                    self.power_threshold()
                }
            }
            FunctionType::Iec61966_2_1 => {
                if y >= self.power(self.d) {
                    self.power_inverse(y)
                } else if self.c.abs() > EPS {
                    y / self.c
                } else {
                    0.0
                }
            }
            FunctionType::Full => {
                if y >= self.power(self.d) + self.e {
                    self.power_inverse(y - self.e)
                } else if self.c.abs() > EPS {
                    (y - self.f) / self.c
                } else {
                    0.0
                }
            }
        };
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_srgb_gamma_roundtrip() {
        for i in 0..=255 {
            let encoded = i as f64 / 255.0;
            let roundtrip = srgb_gamma_encode(srgb_gamma_decode(encoded));
            assert!(
                (roundtrip - encoded).abs() < 1e-10,
                "sRGB roundtrip failed at {}",
                i
            );
        }
    }

    #[test]
    fn test_srgb_known_values() {
        assert!(srgb_gamma_decode(0.0).abs() < EPSILON);
        assert!((srgb_gamma_decode(1.0) - 1.0).abs() < EPSILON);

        // sRGB mid-gray is darker than gamma 2.2
        let mid = srgb_gamma_decode(0.5);
        assert!(mid > 0.21 && mid < 0.22, "Mid-gray decode: {}", mid);
    }

    #[test]
    fn test_simple_gamma() {
        for i in 0..=255 {
            let encoded = i as f64 / 255.0;
            let roundtrip = gamma_encode(gamma_decode(encoded, 2.2), 2.2);
            assert!((roundtrip - encoded).abs() < 1e-10);
        }
    }

    #[test]
    fn test_type0_inverse_is_identity() {
        let func = ParametricFunction::gamma(2.2);
        for i in 1..=1000 {
            let v = i as f64 / 1000.0;
            let y = func.eval(v);
            assert!((y - v.powf(2.2)).abs() < EPSILON);
            assert!((func.eval_inverse(y) - v).abs() < 1e-9, "type 0 at {v}");
        }
    }

    #[test]
    fn test_parametric_srgb_matches_reference() {
        let func = ParametricFunction::srgb();
        for i in 0..=255 {
            let x = i as f64 / 255.0;
            assert!((func.eval(x) - srgb_gamma_decode(x)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inverse_all_types() {
        let cases = [
            ParametricFunction::from_params(FunctionType::Cie122, &[2.2, 1.1, -0.1]),
            ParametricFunction::from_params(FunctionType::Iec61966_3, &[2.0, 0.9, 0.1, 0.05]),
            ParametricFunction::from_params(FunctionType::Iec61966_2_1, &[2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045]),
            ParametricFunction::from_params(
                FunctionType::Full,
                &[2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045, 0.0, 0.0],
            ),
        ];
        for func in cases.into_iter().flatten() {
            for i in 0..=100 {
                let x = i as f64 / 100.0;
                let y = func.eval(x);
                let back = func.eval_inverse(y);
                // Flat regions map back to their start
                assert!(
                    (func.eval(back) - y).abs() < 1e-9,
                    "{:?} at {x}: {y} -> {back}",
                    func.function_type
                );
            }
        }
    }

    #[test]
    fn test_output_is_clamped() {
        let func = ParametricFunction::from_params(FunctionType::Iec61966_3, &[1.0, 1.0, 0.0, 0.5])
            .unwrap();
        assert_eq!(func.eval(1.0), 1.0);
        let negative = ParametricFunction::from_params(FunctionType::Full, &[1.0, 1.0, 0.0, 1.0, 0.5, -0.5, -0.2])
            .unwrap();
        assert_eq!(negative.eval(0.1), 0.0);
    }

    #[test]
    fn test_param_count() {
        assert_eq!(FunctionType::Gamma.param_count(), 1);
        assert_eq!(FunctionType::Cie122.param_count(), 3);
        assert_eq!(FunctionType::Iec61966_3.param_count(), 4);
        assert_eq!(FunctionType::Iec61966_2_1.param_count(), 5);
        assert_eq!(FunctionType::Full.param_count(), 7);
        assert!(ParametricFunction::from_params(FunctionType::Full, &[1.0, 2.0]).is_none());
        assert_eq!(ParametricFunction::gamma(1.8).params(), vec![1.8]);
    }
}
