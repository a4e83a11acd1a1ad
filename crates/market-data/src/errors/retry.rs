/// Classification for failover policy.
///
/// Used to determine how the registry should respond to errors from providers.
///
/// | Class | Try Next Provider? |
/// |-------|--------------------|
/// | `Never` | No |
/// | `NextProvider` | Yes |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry. The failure is terminal for the whole lookup.
    Never,

    /// This provider can't answer, but another provider might.
    NextProvider,
}
