//! Skybox shader programs
//!
//! Both stages are embedded at compile time and validated with naga before
//! any GPU object is created, so a broken program is reported with its stage
//! and a readable diagnostic. `clip_position` and `blend` evaluate the same
//! math on the CPU.

use glam::{Vec3, Vec4};

use crate::backend::{ShaderModuleSource, ShaderStage};

use super::{SkyboxError, SkyboxUniforms};

pub const SKYBOX_VERTEX_WGSL: &str = include_str!("shaders/skybox_vertex.wgsl");
pub const SKYBOX_FRAGMENT_WGSL: &str = include_str!("shaders/skybox_fragment.wgsl");

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

/// Parse and validate a WGSL program and check that `entry_point` exists for `stage`
pub fn validate_program(stage: ShaderStage, wgsl: &str, entry_point: &str) -> Result<(), SkyboxError> {
    let module = naga::front::wgsl::parse_str(wgsl).map_err(|e| SkyboxError::ShaderCompilation {
        stage,
        message: e.emit_to_string(wgsl),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| SkyboxError::ShaderCompilation {
        stage,
        message: e.as_inner().to_string(),
    })?;

    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == entry_point && ep.stage == naga_stage(stage));
    if !found {
        return Err(SkyboxError::ShaderCompilation {
            stage,
            message: format!("no {} entry point named '{}'", stage, entry_point),
        });
    }

    Ok(())
}

/// Validate both embedded programs
pub fn validate_embedded() -> Result<(), SkyboxError> {
    validate_program(ShaderStage::Vertex, SKYBOX_VERTEX_WGSL, VERTEX_ENTRY_POINT)?;
    validate_program(ShaderStage::Fragment, SKYBOX_FRAGMENT_WGSL, FRAGMENT_ENTRY_POINT)?;
    log::info!("Skybox shaders validated");
    Ok(())
}

pub fn vertex_source() -> ShaderModuleSource {
    ShaderModuleSource {
        label: Some("Skybox Vertex Shader".into()),
        wgsl: SKYBOX_VERTEX_WGSL.into(),
        entry_point: VERTEX_ENTRY_POINT.into(),
    }
}

pub fn fragment_source() -> ShaderModuleSource {
    ShaderModuleSource {
        label: Some("Skybox Fragment Shader".into()),
        wgsl: SKYBOX_FRAGMENT_WGSL.into(),
        entry_point: FRAGMENT_ENTRY_POINT.into(),
    }
}

/// Clip-space position produced by the vertex stage for an object-space position
pub fn clip_position(uniforms: &SkyboxUniforms, position: Vec3) -> Vec4 {
    let world_position = uniforms.world * position.extend(1.0);

    let mut view = uniforms.view;
    view.w_axis = Vec4::W;

    let clip = uniforms.projection * view * world_position;
    Vec4::new(clip.x, clip.y, clip.w, clip.w)
}

/// Color produced by the fragment stage from the two cube map samples
pub fn blend(day: Vec4, evening: Vec4, day_progress: f32) -> Vec4 {
    day * (1.0 - day_progress) + evening * day_progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use rstest::rstest;

    fn uniforms_with_camera(eye: Vec3, angle_degrees: f32) -> SkyboxUniforms {
        SkyboxUniforms::new(
            Mat4::from_rotation_y(angle_degrees.to_radians()),
            Mat4::look_at_rh(eye, eye + Vec3::new(0.3, -0.2, -1.0), Vec3::Y),
            Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0),
            0.0,
        )
    }

    #[test]
    fn test_embedded_programs_validate() {
        assert!(validate_embedded().is_ok());
    }

    #[test]
    fn test_wrong_stage_entry_point_is_rejected() {
        let result = validate_program(ShaderStage::Fragment, SKYBOX_VERTEX_WGSL, VERTEX_ENTRY_POINT);
        assert!(matches!(
            result,
            Err(SkyboxError::ShaderCompilation { stage: ShaderStage::Fragment, .. })
        ));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let result = validate_program(ShaderStage::Vertex, "fn vs_main( {", VERTEX_ENTRY_POINT);
        match result {
            Err(SkyboxError::ShaderCompilation { stage, message }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    #[case(Vec3::new(1.0, 0.5, -2.0))]
    #[case(Vec3::new(-2.0, 0.0, 0.0))]
    #[case(Vec3::new(0.0, -1.9, 0.3))]
    fn test_depth_is_far_plane(#[case] position: Vec3) {
        let uniforms = uniforms_with_camera(Vec3::new(3.0, 1.0, 7.0), 12.0);
        let clip = clip_position(&uniforms, position);
        assert!(clip.w != 0.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_translation_does_not_move_sky() {
        let position = Vec3::new(0.7, 0.4, -1.5);
        let near = clip_position(&uniforms_with_camera(Vec3::ZERO, 30.0), position);
        let far = clip_position(&uniforms_with_camera(Vec3::new(50.0, -20.0, 8.0), 30.0), position);
        assert!((near - far).abs().max_element() < 1e-4);
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let day = Vec4::new(0.2, 0.4, 0.8, 1.0);
        let evening = Vec4::new(0.9, 0.3, 0.1, 1.0);

        assert_eq!(blend(day, evening, 0.0), day);
        assert_eq!(blend(day, evening, 1.0), evening);

        let mid = blend(day, evening, 0.25);
        let expected = day + (evening - day) * 0.25;
        assert!((mid - expected).abs().max_element() < 1e-6);
    }
}
