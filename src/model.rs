use std::fmt;

use crate::frontend::vax::ipr::Ipr;
use crate::frontend::vax::state::CpuState;

/// A CPU model: identification plus the routine that brings a `CpuState`
/// to its power-up configuration.
#[derive(Clone, Copy)]
pub struct CpuModel {
    pub name: &'static str,
    pub description: &'static str,
    /// System identification register value (CPU type in bits 31:24).
    pub sid: u32,
    pub init: fn(&CpuModel, &mut CpuState),
}

impl CpuModel {
    /// Initialize `cpu` as this model.
    pub fn initialize(&self, cpu: &mut CpuState) {
        (self.init)(self, cpu);
        tracing::debug!(model = self.name, sid = self.sid, "cpu model initialized");
    }

    /// CPU type field of the SID.
    pub fn cpu_type(&self) -> u8 {
        (self.sid >> 24) as u8
    }
}

impl fmt::Debug for CpuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuModel")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("sid", &format_args!("{:#010x}", self.sid))
            .finish()
    }
}

fn init_standard(model: &CpuModel, cpu: &mut CpuState) {
    cpu.set_ipr(Ipr::Sid, model.sid);
    cpu.reset();
}

/// Known models. The first entry is the default.
pub static CPU_MODELS: &[CpuModel] = &[
    CpuModel {
        name: "vaxstation-4000-90",
        description: "VAXstation 4000 Model 90 (KA49, NVAX)",
        sid: 0x1300_0000,
        init: init_standard,
    },
    CpuModel {
        name: "vaxstation-4000-60",
        description: "VAXstation 4000 Model 60 (KA46, Mariah)",
        sid: 0x1200_0000,
        init: init_standard,
    },
    CpuModel {
        name: "microvax-3100",
        description: "MicroVAX 3100 (KA41, CVAX)",
        sid: 0x0A00_0000,
        init: init_standard,
    },
];

pub fn find_model(name: &str) -> Option<&'static CpuModel> {
    CPU_MODELS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

pub fn default_model() -> &'static CpuModel {
    &CPU_MODELS[0]
}
