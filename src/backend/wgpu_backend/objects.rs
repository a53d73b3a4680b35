//! Every live wgpu object, keyed by the id inside its handle

use std::collections::HashMap;

pub(super) enum GpuObject {
    Buffer(wgpu::Buffer),
    Texture(wgpu::Texture),
    /// `texture` is `None` for the surface image view
    View {
        view: wgpu::TextureView,
        texture: Option<u64>,
    },
    Sampler(wgpu::Sampler),
    Layout(wgpu::BindGroupLayout),
    BindGroup(wgpu::BindGroup),
    Pipeline(wgpu::RenderPipeline),
}

/// Ids are shared by all kinds, so a handle of one kind never resolves to
/// an object of another
#[derive(Default)]
pub(super) struct ObjectTable {
    objects: HashMap<u64, GpuObject>,
    last_id: u64,
}

macro_rules! lookups {
    ($($name:ident: $variant:ident => $ty:ty;)*) => {
        impl ObjectTable {
            $(
                pub(super) fn $name(&self, id: u64) -> Option<&$ty> {
                    match self.objects.get(&id) {
                        Some(GpuObject::$variant(object)) => Some(object),
                        _ => None,
                    }
                }
            )*
        }
    };
}

lookups! {
    buffer: Buffer => wgpu::Buffer;
    texture: Texture => wgpu::Texture;
    sampler: Sampler => wgpu::Sampler;
    layout: Layout => wgpu::BindGroupLayout;
    bind_group: BindGroup => wgpu::BindGroup;
    pipeline: Pipeline => wgpu::RenderPipeline;
}

impl ObjectTable {
    pub(super) fn insert(&mut self, object: GpuObject) -> u64 {
        self.last_id += 1;
        self.objects.insert(self.last_id, object);
        self.last_id
    }

    pub(super) fn view(&self, id: u64) -> Option<&wgpu::TextureView> {
        match self.objects.get(&id) {
            Some(GpuObject::View { view, .. }) => Some(view),
            _ => None,
        }
    }

    pub(super) fn remove(&mut self, id: u64) -> Option<GpuObject> {
        self.objects.remove(&id)
    }

    /// Drop every view created from `texture`
    pub(super) fn remove_views_of(&mut self, texture: u64) {
        self.objects.retain(|_, object| {
            !matches!(object, GpuObject::View { texture: Some(t), .. } if *t == texture)
        });
    }
}
