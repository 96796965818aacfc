use std::fmt;

/// Number of slots in the internal processor register table.
pub const IPR_COUNT: usize = 64;

/// Internal processor registers addressable by MTPR/MFPR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ipr {
    /// Kernel stack pointer.
    Ksp = 0,
    /// Executive stack pointer.
    Esp = 1,
    /// Supervisor stack pointer.
    Ssp = 2,
    /// User stack pointer.
    Usp = 3,
    /// Interrupt stack pointer.
    Isp = 4,
    P0br = 8,
    P0lr = 9,
    P1br = 10,
    P1lr = 11,
    Sbr = 12,
    Slr = 13,
    /// Process control block base.
    Pcbb = 16,
    /// System control block base.
    Scbb = 17,
    /// Alias of PSL<IPL>.
    Ipl = 18,
    Astlvl = 19,
    /// Software interrupt request (write only).
    Sirr = 20,
    /// Software interrupt summary.
    Sisr = 21,
    /// Interval clock control/status.
    Iccs = 24,
    Nicr = 25,
    Icr = 26,
    /// Time of day.
    Todr = 27,
    /// Console receiver control/status.
    Rxcs = 32,
    Rxdb = 33,
    /// Console transmitter control/status.
    Txcs = 34,
    Txdb = 35,
    /// Memory management enable.
    Mapen = 56,
    /// Translation buffer invalidate all.
    Tbia = 57,
    /// Translation buffer invalidate single.
    Tbis = 58,
    /// Performance monitor enable.
    Pme = 61,
    /// System identification.
    Sid = 62,
    /// Translation buffer check.
    Tbchk = 63,
}

impl Ipr {
    pub const ALL: [Ipr; 31] = [
        Ipr::Ksp, Ipr::Esp, Ipr::Ssp, Ipr::Usp, Ipr::Isp,
        Ipr::P0br, Ipr::P0lr, Ipr::P1br, Ipr::P1lr, Ipr::Sbr, Ipr::Slr,
        Ipr::Pcbb, Ipr::Scbb, Ipr::Ipl, Ipr::Astlvl, Ipr::Sirr, Ipr::Sisr,
        Ipr::Iccs, Ipr::Nicr, Ipr::Icr, Ipr::Todr,
        Ipr::Rxcs, Ipr::Rxdb, Ipr::Txcs, Ipr::Txdb,
        Ipr::Mapen, Ipr::Tbia, Ipr::Tbis, Ipr::Pme, Ipr::Sid, Ipr::Tbchk,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a register by its MTPR/MFPR number.
    pub fn from_index(index: u32) -> Option<Ipr> {
        Self::ALL.iter().copied().find(|ipr| ipr.index() as u32 == index)
    }

    pub fn name(self) -> &'static str {
        match self {
            Ipr::Ksp => "KSP",
            Ipr::Esp => "ESP",
            Ipr::Ssp => "SSP",
            Ipr::Usp => "USP",
            Ipr::Isp => "ISP",
            Ipr::P0br => "P0BR",
            Ipr::P0lr => "P0LR",
            Ipr::P1br => "P1BR",
            Ipr::P1lr => "P1LR",
            Ipr::Sbr => "SBR",
            Ipr::Slr => "SLR",
            Ipr::Pcbb => "PCBB",
            Ipr::Scbb => "SCBB",
            Ipr::Ipl => "IPL",
            Ipr::Astlvl => "ASTLVL",
            Ipr::Sirr => "SIRR",
            Ipr::Sisr => "SISR",
            Ipr::Iccs => "ICCS",
            Ipr::Nicr => "NICR",
            Ipr::Icr => "ICR",
            Ipr::Todr => "TODR",
            Ipr::Rxcs => "RXCS",
            Ipr::Rxdb => "RXDB",
            Ipr::Txcs => "TXCS",
            Ipr::Txdb => "TXDB",
            Ipr::Mapen => "MAPEN",
            Ipr::Tbia => "TBIA",
            Ipr::Tbis => "TBIS",
            Ipr::Pme => "PME",
            Ipr::Sid => "SID",
            Ipr::Tbchk => "TBCHK",
        }
    }
}

impl fmt::Display for Ipr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
