//! WGSL stage compilation, interface reflection and link checks.
//!
//! This is the naga half of the wgpu backend: it never touches a device, so
//! compile and link diagnostics are produced before any wgpu object exists.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, BuiltIn, ScalarKind, TypeInner};

use crate::gl::ShaderStage;

/// A named `@location` input or output of an entry point.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InterfaceVar {
    pub name: String,
    pub location: u32,
    pub ty: TypeInner,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ResourceKind {
    Texture,
    Sampler,
}

/// A resource binding read by an entry point.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct ResourceSlot {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub kind: ResourceKind,
}

/// Result of compiling one stage: validated source plus its reflected interface.
#[derive(Debug, Clone)]
pub(crate) struct CompiledShader {
    pub stage: ShaderStage,
    pub source: String,
    pub entry_point: String,
    pub inputs: Vec<InterfaceVar>,
    pub outputs: Vec<InterfaceVar>,
    pub writes_position: bool,
    pub resources: Vec<ResourceSlot>,
}

impl CompiledShader {
    /// Location of the named input, if declared.
    pub fn input_location(&self, name: &str) -> Option<u32> {
        self.inputs.iter().find(|v| v.name == name).map(|v| v.location)
    }
}

/// Parses and validates `source`, then reflects the entry point for `stage`.
///
/// `Err` carries the human-readable diagnostic log.
pub(crate) fn compile(stage: ShaderStage, source: &str) -> Result<CompiledShader, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| error_chain(&e))?;

    let wanted = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    let mut candidates = module
        .entry_points
        .iter()
        .enumerate()
        .filter(|(_, ep)| ep.stage == wanted);

    let Some((index, ep)) = candidates.next() else {
        return Err(format!("error: no @{stage} entry point declared"));
    };
    if let Some((_, extra)) = candidates.next() {
        return Err(format!(
            "error: multiple @{stage} entry points declared (`{}`, `{}`)",
            ep.name, extra.name
        ));
    }

    let mut inputs = Vec::new();
    for arg in &ep.function.arguments {
        collect_locations(
            &module,
            arg.name.as_deref(),
            arg.ty,
            arg.binding.as_ref(),
            &mut inputs,
        );
    }

    let mut outputs = Vec::new();
    let mut writes_position = false;
    if let Some(result) = &ep.function.result {
        collect_locations(&module, None, result.ty, result.binding.as_ref(), &mut outputs);
        writes_position = writes_builtin_position(&module, result.ty, result.binding.as_ref());
    }

    let ep_info = info.get_entry_point(index);
    let mut resources = Vec::new();
    for (handle, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };
        if ep_info[handle].is_empty() {
            continue;
        }
        let name = var.name.clone().unwrap_or_else(|| format!("binding{}", rb.binding));
        let kind = match module.types[var.ty].inner {
            TypeInner::Image { .. } => ResourceKind::Texture,
            TypeInner::Sampler { comparison: false } => ResourceKind::Sampler,
            _ => {
                return Err(format!(
                    "error: resource `{name}` has an unsupported type (only textures and samplers)"
                ));
            }
        };
        resources.push(ResourceSlot { name, group: rb.group, binding: rb.binding, kind });
    }

    Ok(CompiledShader {
        stage,
        source: source.to_string(),
        entry_point: ep.name.clone(),
        inputs,
        outputs,
        writes_position,
        resources,
    })
}

/// Checks that `vertex` and `fragment` form a valid program.
///
/// Returns the merged resource list on success, or the link log on failure.
pub(crate) fn link(
    vertex: &CompiledShader,
    fragment: &CompiledShader,
) -> Result<Vec<ResourceSlot>, String> {
    if vertex.stage != ShaderStage::Vertex || fragment.stage != ShaderStage::Fragment {
        return Err("error: program needs exactly one vertex and one fragment stage".to_string());
    }

    if !vertex.writes_position {
        return Err(format!(
            "error: vertex entry point `{}` does not write @builtin(position)",
            vertex.entry_point
        ));
    }

    for input in &fragment.inputs {
        let Some(output) = vertex.outputs.iter().find(|o| o.location == input.location) else {
            return Err(format!(
                "error: fragment input `{}` at location {} is not written by the vertex stage",
                input.name, input.location
            ));
        };
        if output.ty != input.ty {
            return Err(format!(
                "error: location {} type mismatch: vertex writes {} (`{}`), fragment reads {} (`{}`)",
                input.location,
                type_name(&output.ty),
                output.name,
                type_name(&input.ty),
                input.name
            ));
        }
    }

    let mut merged: Vec<ResourceSlot> = Vec::new();
    for slot in vertex.resources.iter().chain(&fragment.resources) {
        if slot.group != 0 {
            return Err(format!(
                "error: resource `{}` uses bind group {}; only group 0 is supported",
                slot.name, slot.group
            ));
        }
        match merged.iter().find(|m| m.binding == slot.binding) {
            Some(existing) if existing.kind != slot.kind => {
                return Err(format!(
                    "error: binding {} declared as both `{}` and `{}` with different types",
                    slot.binding, existing.name, slot.name
                ));
            }
            Some(_) => {}
            None => merged.push(slot.clone()),
        }
    }
    merged.sort_by_key(|s| s.binding);

    Ok(merged)
}

/// Number of `f32` components of a vertex input type, if it is float-based.
pub(crate) fn float_components(ty: &TypeInner) -> Option<u8> {
    match ty {
        TypeInner::Scalar(s) if s.kind == ScalarKind::Float && s.width == 4 => Some(1),
        TypeInner::Vector { size, scalar } if scalar.kind == ScalarKind::Float && scalar.width == 4 => {
            Some(*size as u8)
        }
        _ => None,
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut log = format!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        log.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    log
}

fn type_name(ty: &TypeInner) -> String {
    match float_components(ty) {
        Some(1) => "f32".to_string(),
        Some(n) => format!("vec{n}<f32>"),
        None => format!("{ty:?}"),
    }
}

fn collect_locations(
    module: &naga::Module,
    name: Option<&str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<InterfaceVar>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(InterfaceVar {
            name: name.unwrap_or_default().to_string(),
            location: *location,
            ty: module.types[ty].inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.name.as_deref(), m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn writes_builtin_position(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
) -> bool {
    match binding {
        Some(Binding::BuiltIn(BuiltIn::Position { .. })) => true,
        Some(_) => false,
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .any(|m| writes_builtin_position(module, m.ty, m.binding.as_ref())),
            _ => false,
        },
    }
}
