/// Pipeline trait and pipeline descriptor
///
/// The renderer only uses a fixed set of programs, named by [`PipelineKind`].
/// Shader compilation and state-object creation belong to the backend.

/// The fixed shader programs the frame orchestrator draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Depth-only rendering into shadow maps
    ShadowDepth,
    /// Camera depth pre-pass
    DepthPrePass,
    /// Forward PBR lighting
    Forward,
    /// Cube-map skybox
    Skybox,
    /// Fullscreen tonemap/gamma
    PostProcess,
    /// Instanced debug lines
    LineGizmo,
}

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
}

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Comparison operator for depth tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Rasterizer depth bias
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBias {
    pub constant_factor: i32,
    pub slope_factor: f32,
    pub clamp: f32,
}

/// Depth testing state (`None` in [`PipelineDesc::depth`] disables the test)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    pub compare_op: CompareOp,
    pub write_enable: bool,
}

/// Descriptor for creating a pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDesc {
    pub kind: PipelineKind,
    pub topology: PrimitiveTopology,
    pub cull_mode: CullMode,
    pub depth: Option<DepthState>,
    pub depth_bias: Option<DepthBias>,
}

/// Pipeline state object
pub trait Pipeline: Send + Sync {
    /// The descriptor this pipeline was created from
    fn desc(&self) -> &PipelineDesc;
}
