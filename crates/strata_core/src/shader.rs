//! Shader blocks and their attribute sets
//!
//! A shape points at most one shader block. The block is a closed union of
//! the two shader families the engine knows: lighting shaders (the common
//! surface material) and effect shaders (glows, fades, projections).
//! Attribute reads answer with a [`ShaderQuery`] so callers can tell "no
//! shader" apart from "a shader of the other family" without an error.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

use crate::block::{Block, BlockRef, ShaderRef, ShapeRef};
use crate::document::Document;
use crate::error::DocumentError;

bitflags! {
    /// First shader flag word
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShaderFlags1: u32 {
        const SPECULAR = 1 << 0;
        const SKINNED = 1 << 1;
        const TEMP_REFRACTION = 1 << 2;
        const VERTEX_ALPHA = 1 << 3;
        const GREYSCALE_TO_PALETTE_COLOR = 1 << 4;
        const GREYSCALE_TO_PALETTE_ALPHA = 1 << 5;
        const FALLOFF = 1 << 6;
        const ENVIRONMENT_MAPPING = 1 << 7;
        const RECEIVE_SHADOWS = 1 << 8;
        const CAST_SHADOWS = 1 << 9;
        const FACEGEN_DETAIL_MAP = 1 << 10;
        const PARALLAX = 1 << 11;
        const MODEL_SPACE_NORMALS = 1 << 12;
        const NON_PROJECTIVE_SHADOWS = 1 << 13;
        const LANDSCAPE = 1 << 14;
        const REFRACTION = 1 << 15;
        const FIRE_REFRACTION = 1 << 16;
        const EYE_ENVIRONMENT_MAPPING = 1 << 17;
        const HAIR_SOFT_LIGHTING = 1 << 18;
        const SCREENDOOR_ALPHA_FADE = 1 << 19;
        const LOCALMAP_HIDE_SECRET = 1 << 20;
        const FACEGEN_RGB_TINT = 1 << 21;
        const OWN_EMIT = 1 << 22;
        const PROJECTED_UV = 1 << 23;
        const MULTIPLE_TEXTURES = 1 << 24;
        const REMAPPABLE_TEXTURES = 1 << 25;
        const DECAL = 1 << 26;
        const DYNAMIC_DECAL = 1 << 27;
        const PARALLAX_OCCLUSION = 1 << 28;
        const EXTERNAL_EMITTANCE = 1 << 29;
        const SOFT_EFFECT = 1 << 30;
        const ZBUFFER_TEST = 1 << 31;
    }
}

bitflags! {
    /// Second shader flag word
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShaderFlags2: u32 {
        const ZBUFFER_WRITE = 1 << 0;
        const LOD_LANDSCAPE = 1 << 1;
        const LOD_OBJECTS = 1 << 2;
        const NO_FADE = 1 << 3;
        const DOUBLE_SIDED = 1 << 4;
        const VERTEX_COLORS = 1 << 5;
        const GLOW_MAP = 1 << 6;
        const ASSUME_SHADOWMASK = 1 << 7;
        const PACKED_TANGENT = 1 << 8;
        const MULTI_INDEX_SNOW = 1 << 9;
        const VERTEX_LIGHTING = 1 << 10;
        const UNIFORM_SCALE = 1 << 11;
        const FIT_SLOPE = 1 << 12;
        const BILLBOARD = 1 << 13;
        const NO_LOD_LAND_BLEND = 1 << 14;
        const ENVMAP_LIGHT_FADE = 1 << 15;
        const WIREFRAME = 1 << 16;
        const WEAPON_BLOOD = 1 << 17;
        const HIDE_ON_LOCAL_MAP = 1 << 18;
        const PREMULT_ALPHA = 1 << 19;
        const CLOUD_LOD = 1 << 20;
        const ANISOTROPIC_LIGHTING = 1 << 21;
        const NO_TRANSPARENCY_MULTISAMPLING = 1 << 22;
        const UNUSED01 = 1 << 23;
        const MULTI_LAYER_PARALLAX = 1 << 24;
        const SOFT_LIGHTING = 1 << 25;
        const RIM_LIGHTING = 1 << 26;
        const BACK_LIGHTING = 1 << 27;
        const UNUSED02 = 1 << 28;
        const TREE_ANIM = 1 << 29;
        const EFFECT_LIGHTING = 1 << 30;
        const HD_LOD_OBJECTS = 1 << 31;
    }
}

// Flag words travel as raw bits; unknown bits from newer writers are kept.

impl Serialize for ShaderFlags1 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShaderFlags1 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ShaderFlags1::from_bits_retain(u32::deserialize(
            deserializer,
        )?))
    }
}

impl Serialize for ShaderFlags2 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShaderFlags2 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ShaderFlags2::from_bits_retain(u32::deserialize(
            deserializer,
        )?))
    }
}

impl Default for ShaderFlags1 {
    fn default() -> Self {
        ShaderFlags1::SPECULAR | ShaderFlags1::RECEIVE_SHADOWS | ShaderFlags1::CAST_SHADOWS
    }
}

impl Default for ShaderFlags2 {
    fn default() -> Self {
        ShaderFlags2::ZBUFFER_WRITE
    }
}

/// What surface treatment a lighting shader applies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightingKind {
    #[default]
    Default,
    EnvironmentMap,
    GlowShader,
    Parallax,
    FaceTint,
    SkinTint,
    HairTint,
    ParallaxOcclusion,
    MultitextureLandscape,
    LodLandscape,
    Snow,
    MultiLayerParallax,
    TreeAnim,
    LodObjects,
    SparkleSnow,
    LodObjectsHd,
    EyeEnvmap,
    Cloud,
    LodLandscapeNoise,
    MultitextureLandscapeLodBlend,
    Dismemberment,
}

/// UV transform applied before texture lookup
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UvTransform {
    pub offset: [f32; 2],
    pub scale: [f32; 2],
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: [1.0, 1.0],
        }
    }
}

/// Attribute set for the lighting shader family
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightingAttributes {
    pub name: String,
    pub kind: LightingKind,
    pub flags_1: ShaderFlags1,
    pub flags_2: ShaderFlags2,
    pub uv: UvTransform,
    /// Texture paths by slot; empty strings leave a slot unbound
    pub textures: Vec<String>,
    pub emissive_color: [f32; 4],
    pub emissive_multiple: f32,
    pub environment_map_scale: f32,
    pub texture_clamp_mode: u32,
    pub alpha: f32,
    pub refraction_strength: f32,
    pub glossiness: f32,
    pub specular_color: [f32; 3],
    pub specular_strength: f32,
    pub soft_lighting: f32,
    pub rim_light_power: f32,
    pub skin_tint_color: [f32; 3],
}

impl Default for LightingAttributes {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: LightingKind::Default,
            flags_1: ShaderFlags1::default(),
            flags_2: ShaderFlags2::default(),
            uv: UvTransform::default(),
            textures: Vec::new(),
            emissive_color: [0.0, 0.0, 0.0, 1.0],
            emissive_multiple: 1.0,
            environment_map_scale: 1.0,
            texture_clamp_mode: 3,
            alpha: 1.0,
            refraction_strength: 0.0,
            glossiness: 80.0,
            specular_color: [1.0, 1.0, 1.0],
            specular_strength: 1.0,
            soft_lighting: 0.3,
            rim_light_power: 2.0,
            skin_tint_color: [1.0, 1.0, 1.0],
        }
    }
}

impl LightingAttributes {
    pub fn new(name: impl Into<String>, kind: LightingKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    pub fn with_textures(mut self, textures: Vec<String>) -> Self {
        self.textures = textures;
        self
    }

    /// The texture bound to a slot, if the slot exists and is non-empty
    pub fn texture(&self, slot: usize) -> Option<&str> {
        self.textures
            .get(slot)
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }
}

/// Attribute set for the effect shader family
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectAttributes {
    pub name: String,
    pub flags_1: ShaderFlags1,
    pub flags_2: ShaderFlags2,
    pub uv: UvTransform,
    pub source_texture: String,
    pub greyscale_texture: String,
    pub falloff_start_angle: f32,
    pub falloff_stop_angle: f32,
    pub falloff_start_opacity: f32,
    pub falloff_stop_opacity: f32,
    pub emissive_color: [f32; 4],
    pub emissive_multiple: f32,
    pub soft_falloff_depth: f32,
    pub environment_map_scale: f32,
    pub texture_clamp_mode: u32,
}

impl Default for EffectAttributes {
    fn default() -> Self {
        Self {
            name: String::new(),
            flags_1: ShaderFlags1::ZBUFFER_TEST,
            flags_2: ShaderFlags2::empty(),
            uv: UvTransform::default(),
            source_texture: String::new(),
            greyscale_texture: String::new(),
            falloff_start_angle: 1.0,
            falloff_stop_angle: 1.0,
            falloff_start_opacity: 0.0,
            falloff_stop_opacity: 0.0,
            emissive_color: [1.0, 1.0, 1.0, 1.0],
            emissive_multiple: 1.0,
            soft_falloff_depth: 0.0,
            environment_map_scale: 1.0,
            texture_clamp_mode: 3,
        }
    }
}

impl EffectAttributes {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A shader block: one of the two shader families
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shader {
    Lighting(LightingAttributes),
    Effect(EffectAttributes),
}

impl Shader {
    pub fn name(&self) -> &str {
        match self {
            Shader::Lighting(attributes) => &attributes.name,
            Shader::Effect(attributes) => &attributes.name,
        }
    }
}

/// Outcome of asking a shape for shader attributes of one family.
///
/// `NoShader` means the shape has no shader block at all; `WrongKind` means
/// it has one, but of the other family. Neither is a document error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderQuery<T> {
    Found(T),
    NoShader,
    WrongKind,
}

impl<T> ShaderQuery<T> {
    /// The attributes, if the query landed on the right family
    pub fn found(self) -> Option<T> {
        match self {
            ShaderQuery::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ShaderQuery::Found(_))
    }
}

impl Document {
    /// Attach a shader block to a shape.
    ///
    /// If the shape already has one, the block is replaced in place and the
    /// existing reference stays valid; otherwise a new block is allocated.
    pub fn set_shader(&mut self, shape: ShapeRef, shader: Shader) -> Result<ShaderRef, DocumentError> {
        if let Some(existing) = self.shape(shape)?.shader {
            *self.shader_mut(existing)? = shader;
            return Ok(existing);
        }
        let shader_ref = ShaderRef::from_key(self.insert(Block::Shader(shader)));
        self.shape_mut(shape)?.shader = Some(shader_ref);
        Ok(shader_ref)
    }

    /// The shader block a shape points at, if any
    pub fn shader_ref(&self, shape: ShapeRef) -> Result<Option<ShaderRef>, DocumentError> {
        Ok(self.shape(shape)?.shader)
    }

    /// The name of a shape's shader, if it has one
    pub fn shader_name(&self, shape: ShapeRef) -> Result<Option<&str>, DocumentError> {
        match self.shape(shape)?.shader {
            Some(shader_ref) => Ok(Some(self.shader(shader_ref)?.name())),
            None => Ok(None),
        }
    }

    /// Lighting attributes of a shape's shader
    pub fn lighting_attributes(
        &self,
        shape: ShapeRef,
    ) -> Result<ShaderQuery<&LightingAttributes>, DocumentError> {
        let Some(shader_ref) = self.shape(shape)?.shader else {
            return Ok(ShaderQuery::NoShader);
        };
        match self.shader(shader_ref)? {
            Shader::Lighting(attributes) => Ok(ShaderQuery::Found(attributes)),
            Shader::Effect(_) => Ok(ShaderQuery::WrongKind),
        }
    }

    /// Effect attributes of a shape's shader
    pub fn effect_attributes(
        &self,
        shape: ShapeRef,
    ) -> Result<ShaderQuery<&EffectAttributes>, DocumentError> {
        let Some(shader_ref) = self.shape(shape)?.shader else {
            return Ok(ShaderQuery::NoShader);
        };
        match self.shader(shader_ref)? {
            Shader::Lighting(_) => Ok(ShaderQuery::WrongKind),
            Shader::Effect(attributes) => Ok(ShaderQuery::Found(attributes)),
        }
    }

    /// Overwrite the lighting attributes of a shape's shader.
    ///
    /// Answers `NoShader`/`WrongKind` instead of writing when the shape has
    /// no lighting shader to update.
    pub fn set_lighting_attributes(
        &mut self,
        shape: ShapeRef,
        attributes: LightingAttributes,
    ) -> Result<ShaderQuery<()>, DocumentError> {
        let Some(shader_ref) = self.shape(shape)?.shader else {
            return Ok(ShaderQuery::NoShader);
        };
        match self.shader_mut(shader_ref)? {
            Shader::Lighting(existing) => {
                *existing = attributes;
                Ok(ShaderQuery::Found(()))
            }
            Shader::Effect(_) => Ok(ShaderQuery::WrongKind),
        }
    }

    /// Overwrite the effect attributes of a shape's shader
    pub fn set_effect_attributes(
        &mut self,
        shape: ShapeRef,
        attributes: EffectAttributes,
    ) -> Result<ShaderQuery<()>, DocumentError> {
        let Some(shader_ref) = self.shape(shape)?.shader else {
            return Ok(ShaderQuery::NoShader);
        };
        match self.shader_mut(shader_ref)? {
            Shader::Lighting(_) => Ok(ShaderQuery::WrongKind),
            Shader::Effect(existing) => {
                *existing = attributes;
                Ok(ShaderQuery::Found(()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lighting_attributes() {
        let attributes = LightingAttributes::default();
        assert_eq!(attributes.glossiness, 80.0);
        assert_eq!(attributes.texture_clamp_mode, 3);
        assert!(attributes.flags_1.contains(ShaderFlags1::SPECULAR));
        assert!(attributes.flags_2.contains(ShaderFlags2::ZBUFFER_WRITE));
    }

    #[test]
    fn test_texture_slot_lookup() {
        let attributes = LightingAttributes::new("skin", LightingKind::SkinTint).with_textures(vec![
            "textures/body.dds".to_string(),
            String::new(),
            "textures/body_n.dds".to_string(),
        ]);
        assert_eq!(attributes.texture(0), Some("textures/body.dds"));
        assert_eq!(attributes.texture(1), None, "empty slot should read as unbound");
        assert_eq!(attributes.texture(5), None);
    }

    #[test]
    fn test_shader_name_covers_both_families() {
        let lighting = Shader::Lighting(LightingAttributes::new("hair", LightingKind::HairTint));
        let effect = Shader::Effect(EffectAttributes::new("glow"));
        assert_eq!(lighting.name(), "hair");
        assert_eq!(effect.name(), "glow");
    }

    #[test]
    fn test_shader_query_found() {
        let query: ShaderQuery<u32> = ShaderQuery::Found(7);
        assert_eq!(query.found(), Some(7));
        assert!(ShaderQuery::<u32>::NoShader.found().is_none());
        assert!(ShaderQuery::<u32>::WrongKind.found().is_none());
    }

    #[test]
    fn test_flags_serde_keeps_unknown_bits() {
        let raw = 0x8000_0001_u32;
        let flags = ShaderFlags1::from_bits_retain(raw);
        let text = ron::to_string(&flags).unwrap();
        let back: ShaderFlags1 = ron::from_str(&text).unwrap();
        assert_eq!(back.bits(), raw);
    }
}
