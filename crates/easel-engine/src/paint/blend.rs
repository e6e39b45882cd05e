/// Framebuffer blend function applied to a batch.
///
/// Colors reaching the blend stage are straight (non-premultiplied) alpha.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Source replaces destination; alpha is ignored.
    Opaque,
    /// `src * a + dst * (1 - a)`.
    #[default]
    Alpha,
    /// `src * a + dst`.
    Additive,
    /// `dst - src * a`.
    Subtract,
    /// `src * dst`.
    Multiply,
    /// `src + dst * (1 - src)`.
    Screen,
    /// Per-channel maximum.
    Lightest,
    /// Per-channel minimum.
    Darkest,
}

impl BlendMode {
    /// Wgpu blend state for this mode. `None` disables blending.
    pub fn to_wgpu(self) -> Option<wgpu::BlendState> {
        use wgpu::{BlendComponent, BlendFactor as F, BlendOperation as Op, BlendState};

        let component = |src_factor, dst_factor, operation| BlendComponent {
            src_factor,
            dst_factor,
            operation,
        };
        let same = |c: BlendComponent| BlendState { color: c, alpha: c };

        match self {
            BlendMode::Opaque => None,
            BlendMode::Alpha => Some(BlendState::ALPHA_BLENDING),
            BlendMode::Additive => Some(BlendState {
                color: component(F::SrcAlpha, F::One, Op::Add),
                alpha: component(F::Zero, F::One, Op::Add),
            }),
            BlendMode::Subtract => Some(BlendState {
                color: component(F::SrcAlpha, F::One, Op::ReverseSubtract),
                alpha: component(F::Zero, F::One, Op::Add),
            }),
            BlendMode::Multiply => Some(same(component(F::Dst, F::Zero, Op::Add))),
            BlendMode::Screen => Some(same(component(F::One, F::OneMinusSrc, Op::Add))),
            BlendMode::Lightest => Some(same(component(F::One, F::One, Op::Max))),
            BlendMode::Darkest => Some(same(component(F::One, F::One, Op::Min))),
        }
    }

    pub const ALL: [BlendMode; 8] = [
        BlendMode::Opaque,
        BlendMode::Alpha,
        BlendMode::Additive,
        BlendMode::Subtract,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Lightest,
        BlendMode::Darkest,
    ];
}
