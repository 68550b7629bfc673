#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Instant transfer, the only kind wired up.
    Inft,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOption {
    pub kind: TransferKind,
    pub title: &'static str,
    pub detail: &'static str,
    pub available: bool,
}

/// Landing screen: choose a transfer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub options: Vec<TransferOption>,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            options: vec![
                TransferOption {
                    kind: TransferKind::Inft,
                    title: "INFT",
                    detail: "No fee · Real-time",
                    available: true,
                },
                TransferOption {
                    kind: TransferKind::Standard,
                    title: "Standard transfer",
                    detail: "1–3 business days",
                    available: false,
                },
            ],
        }
    }

    pub fn is_available(&self, kind: TransferKind) -> bool {
        self.options
            .iter()
            .any(|option| option.kind == kind && option.available)
    }
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}
