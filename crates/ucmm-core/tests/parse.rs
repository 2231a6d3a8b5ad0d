//! Profile loading, tag access and error kinds through the public API

mod common;

use std::fs;
use std::path::PathBuf;

use common::{D50, ProfileBuilder, mluc, srgb_display, xyz};
use ucmm_core::icc::{ColorSpace, KnownTag, MemorySource, TypeVariant};
use ucmm_core::{Error, IccError, IccProfile, ProfileClass, RenderingIntent, ResultCode, TagSignature};

fn temp_profile(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ucmm-{}-{name}.icc", std::process::id()));
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_header_fields() -> anyhow::Result<()> {
    let profile = IccProfile::from_bytes(srgb_display().intent(1).build())?;
    let header = profile.header()?;
    assert_eq!(header.version.major, 4);
    assert_eq!(header.version.minor, 3);
    assert_eq!(header.device_class, ProfileClass::Display);
    assert_eq!(header.color_space, ColorSpace::Rgb);
    assert_eq!(header.pcs, ColorSpace::Xyz);
    assert_eq!(header.intent(), Some(RenderingIntent::RelativeColorimetric));
    let illuminant = header.illuminant.to_xyz();
    assert!((illuminant.x - D50[0]).abs() < 1e-4);
    assert!((illuminant.z - D50[2]).abs() < 1e-4);
    Ok(())
}

#[test]
fn test_tag_listing() -> anyhow::Result<()> {
    let mut profile = IccProfile::from_bytes(srgb_display().build())?;
    let tags = profile.tag_signatures()?;
    assert_eq!(tags.len(), 8);
    assert!(tags.contains(&TagSignature::MEDIA_WHITE));
    assert!(profile.has_tag(TagSignature::RED_TRC)?);
    assert!(!profile.has_tag(TagSignature::B2A0)?);
    assert_eq!(profile.parser().tag_count(), 8);
    assert!(TagSignature::RED_TRC.known().is_some());
    assert_eq!(KnownTag::ALL.len(), ucmm_core::icc::KNOWN_TAG_COUNT);
    Ok(())
}

#[test]
fn test_descriptions() -> anyhow::Result<()> {
    let mut profile = IccProfile::from_bytes(srgb_display().build())?;
    assert_eq!(profile.description()?.as_deref(), Some("sRGB-like display"));

    let localized = ProfileBuilder::new().tag(
        b"desc",
        mluc(&[("de", "DE", "Bildschirm"), ("en", "US", "Display")]),
    );
    let mut profile = IccProfile::from_bytes(localized.build())?;
    assert_eq!(profile.description()?.as_deref(), Some("Display"));

    let mut bare = IccProfile::from_bytes(ProfileBuilder::new().build())?;
    assert_eq!(bare.description()?, None);
    Ok(())
}

#[test]
fn test_typed_payloads() -> anyhow::Result<()> {
    let mut profile = IccProfile::from_bytes(srgb_display().build())?;
    let white = profile.obtain_tag_data(TagSignature::MEDIA_WHITE)?;
    let TypeVariant::XyzArray(values) = white else {
        panic!("expected XYZ, got {white:?}");
    };
    assert_eq!(values.values.len(), 1);

    let trc = profile.obtain_tag_data(TagSignature::RED_TRC)?;
    assert!(matches!(trc, TypeVariant::ParametricCurve(_)));
    let curve = trc.as_curve_eval().unwrap();
    assert!((curve.eval_inverse(curve.eval(0.4)) - 0.4).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_file_source() -> anyhow::Result<()> {
    let path = temp_profile("file-source", &srgb_display().build());
    let mut profile = IccProfile::load_path(&path)?;
    assert!(profile.is_loaded());
    assert_eq!(profile.source().path(), path.as_path());

    profile.obtain_tag_data(TagSignature::RED_COLORANT)?;
    profile.close();
    assert!(!profile.is_open());

    // Uncached tags reopen the file
    profile.obtain_tag_data(TagSignature::GREEN_COLORANT)?;
    assert!(profile.is_open());

    profile.close();
    fs::remove_file(&path)?;

    // Cached tags survive the file going away, others report NoFile
    assert!(profile.obtain_tag_data(TagSignature::GREEN_COLORANT).is_ok());
    let err = Error::from(
        profile
            .obtain_tag_data(TagSignature::BLUE_COLORANT)
            .unwrap_err(),
    );
    assert_eq!(err.code(), ResultCode::NoFile);
    Ok(())
}

#[test]
fn test_missing_file() {
    let err = IccProfile::load_path("/nonexistent/ucmm/missing.icc").unwrap_err();
    assert_eq!(Error::from(err).code(), ResultCode::NoFile);
}

#[test]
fn test_corrupted_signature() {
    let mut bytes = srgb_display().build();
    bytes[36..40].copy_from_slice(b"ACSP");
    let err = IccProfile::from_bytes(bytes).unwrap_err();
    assert!(matches!(err, IccError::InvalidSignature(_)));
    assert_eq!(Error::from(err).code(), ResultCode::ParsingFailed);
}

#[test]
fn test_truncated_profiles() {
    let bytes = srgb_display().build();
    assert!(IccProfile::from_bytes(bytes[..100].to_vec()).is_err());

    // Header intact, tag table cut short
    let mut profile = IccProfile::from_bytes(bytes[..140].to_vec()).unwrap();
    let err = profile.obtain_tag_data(TagSignature::RED_TRC).unwrap_err();
    assert!(matches!(err, IccError::TruncatedData { .. }));
}

#[test]
fn test_excessive_tag_count() {
    let mut bytes = ProfileBuilder::new().build();
    bytes[128..132].copy_from_slice(&0x1000_0000u32.to_be_bytes());
    let mut profile = IccProfile::new(MemorySource::new(bytes));
    profile.load().unwrap();
    let err = Error::from(profile.has_tag(TagSignature::A2B0).unwrap_err());
    assert_eq!(err.code(), ResultCode::ParsingFailed);
}

#[test]
fn test_tag_outside_profile() {
    let mut bytes = ProfileBuilder::new().tag(b"wtpt", xyz(D50)).build();
    // Offset of the only tag table entry
    bytes[136..140].copy_from_slice(&0x0010_0000u32.to_be_bytes());
    let mut profile = IccProfile::from_bytes(bytes).unwrap();
    let err = profile.obtain_tag_data(TagSignature::MEDIA_WHITE).unwrap_err();
    assert!(matches!(err, IccError::TagOutOfBounds { .. }));
}

#[test]
fn test_unsupported_tag_type() {
    let mut payload = b"ZZZZ\0\0\0\0".to_vec();
    payload.extend([0u8; 8]);
    let mut profile = IccProfile::from_bytes(ProfileBuilder::new().tag(b"tech", payload).build())
        .unwrap();
    let err = Error::from(profile.obtain_tag_data(TagSignature::TECH).unwrap_err());
    assert_eq!(err.code(), ResultCode::WrongType);
}

#[test]
fn test_duplicate_tag_last_wins() -> anyhow::Result<()> {
    let builder = ProfileBuilder::new()
        .tag(b"wtpt", xyz([0.5, 0.5, 0.5]))
        .tag(b"wtpt", xyz(D50));
    let mut profile = IccProfile::from_bytes(builder.build())?;
    let white = profile
        .obtain_tag_data(TagSignature::MEDIA_WHITE)?
        .as_xyz_array()
        .and_then(|a| a.to_xyz())
        .unwrap();
    assert!((white.x - D50[0]).abs() < 1e-4);
    Ok(())
}
