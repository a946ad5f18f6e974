//! Change tokens and their dispatch branches

use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;
use crate::resource::ResourceKind;

/// One logical attribute that can change on an owning node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeToken {
    /// Expand to the node's canonical list
    Init,
    /// Refresh values without attach/detach
    ClearInit,
    /// Object name
    Name,
    /// Visibility
    Visible,
    /// Shadow casting
    CastShadow,
    /// Shadow receiving
    ReceiveShadow,
    /// Frustum culling
    FrustumCulled,
    /// Render order
    RenderOrder,
    /// Automatic matrix update
    MatrixAutoUpdate,
    /// Position component or literal
    Position,
    /// Rotation component or literal
    Rotation,
    /// Scale component or literal
    Scale,
    /// Look-at component or literal
    Lookat,
    /// Material components or literal color
    Material,
    /// Geometry component or literal family
    Geometry,
    /// Child object nodes
    Object3d,
    /// Controller behaviours
    Controller,
    /// Rigid body behaviours
    Rigidbody,
    /// Animation mixers
    Mixer,
}

/// Literal slots written straight onto the scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralSlot {
    /// Object name
    Name,
    /// Visibility flag
    Visible,
    /// Shadow casting flag
    CastShadow,
    /// Shadow receiving flag
    ReceiveShadow,
    /// Frustum culling flag
    FrustumCulled,
    /// Render order
    RenderOrder,
    /// Automatic matrix update flag
    MatrixAutoUpdate,
}

/// Content-child lists re-parented by the structural branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralKind {
    /// Child objects
    Object3d,
    /// Controllers
    Controller,
    /// Rigid bodies
    Rigidbody,
    /// Animation mixers
    Mixer,
}

impl StructuralKind {
    /// Token queued when this list changes
    pub fn token(self) -> ChangeToken {
        match self {
            Self::Object3d => ChangeToken::Object3d,
            Self::Controller => ChangeToken::Controller,
            Self::Rigidbody => ChangeToken::Rigidbody,
            Self::Mixer => ChangeToken::Mixer,
        }
    }

    /// Whether children are scene objects rather than behaviours
    pub fn holds_objects(self) -> bool {
        matches!(self, Self::Object3d)
    }
}

/// How a token is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Handled before dispatch by the change-set
    Reserved,
    /// Resolve and write a literal
    Literal(LiteralSlot),
    /// Diff the attached resource list
    Resource(ResourceKind),
    /// Re-parent a content-child list
    Structural(StructuralKind),
}

impl ChangeToken {
    /// Every token except the reserved ones
    pub const ATTRIBUTES: [Self; 17] = [
        Self::Name,
        Self::Visible,
        Self::CastShadow,
        Self::ReceiveShadow,
        Self::FrustumCulled,
        Self::RenderOrder,
        Self::MatrixAutoUpdate,
        Self::Position,
        Self::Rotation,
        Self::Scale,
        Self::Lookat,
        Self::Material,
        Self::Geometry,
        Self::Object3d,
        Self::Controller,
        Self::Rigidbody,
        Self::Mixer,
    ];

    /// Dispatch table
    pub fn branch(self) -> Branch {
        match self {
            Self::Init | Self::ClearInit => Branch::Reserved,
            Self::Name => Branch::Literal(LiteralSlot::Name),
            Self::Visible => Branch::Literal(LiteralSlot::Visible),
            Self::CastShadow => Branch::Literal(LiteralSlot::CastShadow),
            Self::ReceiveShadow => Branch::Literal(LiteralSlot::ReceiveShadow),
            Self::FrustumCulled => Branch::Literal(LiteralSlot::FrustumCulled),
            Self::RenderOrder => Branch::Literal(LiteralSlot::RenderOrder),
            Self::MatrixAutoUpdate => Branch::Literal(LiteralSlot::MatrixAutoUpdate),
            Self::Position => Branch::Resource(ResourceKind::Position),
            Self::Rotation => Branch::Resource(ResourceKind::Rotation),
            Self::Scale => Branch::Resource(ResourceKind::Scale),
            Self::Lookat => Branch::Resource(ResourceKind::Lookat),
            Self::Material => Branch::Resource(ResourceKind::Material),
            Self::Geometry => Branch::Resource(ResourceKind::Geometry),
            Self::Object3d => Branch::Structural(StructuralKind::Object3d),
            Self::Controller => Branch::Structural(StructuralKind::Controller),
            Self::Rigidbody => Branch::Structural(StructuralKind::Rigidbody),
            Self::Mixer => Branch::Structural(StructuralKind::Mixer),
        }
    }

    /// Lowercase token name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ClearInit => "clearinit",
            Self::Name => "name",
            Self::Visible => "visible",
            Self::CastShadow => "castshadow",
            Self::ReceiveShadow => "receiveshadow",
            Self::FrustumCulled => "frustumculled",
            Self::RenderOrder => "renderorder",
            Self::MatrixAutoUpdate => "matrixautoupdate",
            Self::Position => "position",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Lookat => "lookat",
            Self::Material => "material",
            Self::Geometry => "geometry",
            Self::Object3d => "object3d",
            Self::Controller => "controller",
            Self::Rigidbody => "rigidbody",
            Self::Mixer => "mixer",
        }
    }

    /// Whether the token touches the local transform
    pub fn is_transform(self) -> bool {
        matches!(self.branch(), Branch::Resource(kind) if kind.is_transform())
    }
}

impl From<ResourceKind> for ChangeToken {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Position => Self::Position,
            ResourceKind::Rotation => Self::Rotation,
            ResourceKind::Scale => Self::Scale,
            ResourceKind::Lookat => Self::Lookat,
            ResourceKind::Material => Self::Material,
            ResourceKind::Geometry => Self::Geometry,
        }
    }
}

impl fmt::Display for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeToken {
    type Err = SyncError;

    /// Case-insensitive; `-` and `_` are ignored so `cast_shadow` works
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let token = match key.as_str() {
            "init" => Self::Init,
            "clearinit" => Self::ClearInit,
            "name" => Self::Name,
            "visible" => Self::Visible,
            "castshadow" => Self::CastShadow,
            "receiveshadow" => Self::ReceiveShadow,
            "frustumculled" => Self::FrustumCulled,
            "renderorder" => Self::RenderOrder,
            "matrixautoupdate" => Self::MatrixAutoUpdate,
            "position" => Self::Position,
            "rotation" => Self::Rotation,
            "scale" => Self::Scale,
            "lookat" => Self::Lookat,
            "material" => Self::Material,
            "geometry" => Self::Geometry,
            "object3d" => Self::Object3d,
            "controller" => Self::Controller,
            "rigidbody" => Self::Rigidbody,
            "mixer" => Self::Mixer,
            _ => return Err(SyncError::UnknownToken(name.to_string())),
        };
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for token in ChangeToken::ATTRIBUTES {
            assert_eq!(token.as_str().parse::<ChangeToken>().unwrap(), token);
        }
        assert_eq!("Cast_Shadow".parse::<ChangeToken>().unwrap(), ChangeToken::CastShadow);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        assert!(matches!(
            "wobble".parse::<ChangeToken>(),
            Err(SyncError::UnknownToken(name)) if name == "wobble"
        ));
    }

    #[test]
    fn test_branches() {
        assert_eq!(ChangeToken::Visible.branch(), Branch::Literal(LiteralSlot::Visible));
        assert_eq!(ChangeToken::Material.branch(), Branch::Resource(ResourceKind::Material));
        assert_eq!(ChangeToken::Mixer.branch(), Branch::Structural(StructuralKind::Mixer));
        assert_eq!(ChangeToken::Init.branch(), Branch::Reserved);
        assert!(ChangeToken::Lookat.is_transform());
        assert!(!ChangeToken::Material.is_transform());
    }
}
