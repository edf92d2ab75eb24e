//! Legacy object construction from source axes.
//!
//! Each source axis becomes one [`AxisArg`]; the complete list is then matched
//! against the legacy constructors in a single call, since legacy objects
//! cannot be shaped incrementally.

use hc_core::{Error, Result};
use hc_legacy::{LegacyValue, TAxis, THist};
use hc_rhist::Axis;

/// Constructor arguments contributed by one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisArg {
    /// `(nbins, low, high)`.
    Uniform {
        /// Regular bins.
        nbins: usize,
        /// Lower edge.
        low: f64,
        /// Upper edge.
        high: f64,
    },
    /// `(nbins, edges)`.
    Variable {
        /// Regular bins.
        nbins: usize,
        /// `nbins + 1` borders.
        edges: Vec<f64>,
    },
}

impl AxisArg {
    /// Arguments for a source axis. Growable axes are built as uniform axes
    /// (the extend flag is set afterwards); labeled axes as `(n, 0, n)`.
    pub fn from_axis(axis: &Axis) -> Self {
        match axis {
            Axis::Equidistant(_) | Axis::Growable(_) => AxisArg::Uniform {
                nbins: axis.n_bins_no_over(),
                low: axis.minimum(),
                high: axis.maximum(),
            },
            Axis::Irregular(a) => AxisArg::Variable {
                nbins: axis.n_bins_no_over(),
                edges: a.bin_borders().to_vec(),
            },
            Axis::Labels(a) => {
                let n = a.bin_labels().len();
                AxisArg::Uniform { nbins: n, low: 0.0, high: n as f64 }
            }
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            AxisArg::Uniform { .. } => "(nbins, low, high)",
            AxisArg::Variable { .. } => "(nbins, edges)",
        }
    }
}

fn describe(args: &[AxisArg]) -> String {
    args.iter().map(AxisArg::shape).collect::<Vec<_>>().join(", ")
}

/// Legacy classes that can be built from an [`AxisArg`] list.
pub trait LegacyConstruct: Sized {
    /// Build an empty histogram; fails when no constructor takes `args`.
    fn construct(name: &str, title: &str, args: &[AxisArg]) -> Result<Self>;
}

impl<P: LegacyValue> LegacyConstruct for THist<1, P> {
    fn construct(name: &str, title: &str, args: &[AxisArg]) -> Result<Self> {
        match args {
            [AxisArg::Uniform { nbins, low, high }] => Self::new(name, title, *nbins, *low, *high),
            [AxisArg::Variable { nbins, edges }] => Self::with_edges(name, title, *nbins, edges),
            _ => Err(Error::Validation(format!("TH1 takes one axis, got [{}]", describe(args)))),
        }
    }
}

impl<P: LegacyValue> LegacyConstruct for THist<2, P> {
    fn construct(name: &str, title: &str, args: &[AxisArg]) -> Result<Self> {
        use AxisArg::{Uniform, Variable};
        match args {
            [Uniform { nbins: nx, low: xl, high: xh }, Uniform { nbins: ny, low: yl, high: yh }] => {
                Self::new(name, title, *nx, *xl, *xh, *ny, *yl, *yh)
            }
            [Variable { nbins: nx, edges: xe }, Uniform { nbins: ny, low: yl, high: yh }] => {
                Self::with_x_edges(name, title, *nx, xe, *ny, *yl, *yh)
            }
            [Uniform { nbins: nx, low: xl, high: xh }, Variable { nbins: ny, edges: ye }] => {
                Self::with_y_edges(name, title, *nx, *xl, *xh, *ny, ye)
            }
            [Variable { nbins: nx, edges: xe }, Variable { nbins: ny, edges: ye }] => {
                Self::with_edges(name, title, *nx, xe, *ny, ye)
            }
            _ => Err(Error::Validation(format!("TH2 takes two axes, got [{}]", describe(args)))),
        }
    }
}

impl<P: LegacyValue> LegacyConstruct for THist<3, P> {
    fn construct(name: &str, title: &str, args: &[AxisArg]) -> Result<Self> {
        use AxisArg::{Uniform, Variable};
        match args {
            [
                Uniform { nbins: nx, low: xl, high: xh },
                Uniform { nbins: ny, low: yl, high: yh },
                Uniform { nbins: nz, low: zl, high: zh },
            ] => Self::new(name, title, *nx, *xl, *xh, *ny, *yl, *yh, *nz, *zl, *zh),
            [
                Variable { nbins: nx, edges: xe },
                Variable { nbins: ny, edges: ye },
                Variable { nbins: nz, edges: ze },
            ] => Self::with_edges(name, title, *nx, xe, *ny, ye, *nz, ze),
            [_, _, _] => Err(Error::InhomogeneousAxes(format!("[{}]", describe(args)))),
            _ => Err(Error::Validation(format!("TH3 takes three axes, got [{}]", describe(args)))),
        }
    }
}

/// Build the legacy histogram for `axes` and back-fill per-axis properties.
pub fn build<const D: usize, P>(axes: &[Axis; D], name: &str, title: &str) -> Result<THist<D, P>>
where
    P: LegacyValue,
    THist<D, P>: LegacyConstruct,
{
    let args: Vec<AxisArg> = axes.iter().map(AxisArg::from_axis).collect();
    let mut dest = THist::<D, P>::construct(name, title, &args)?;
    for (idx, axis) in axes.iter().enumerate() {
        backfill(axis, dest.axis_mut(idx)?)?;
    }
    Ok(dest)
}

fn backfill(src: &Axis, dest: &mut TAxis) -> Result<()> {
    dest.set_title(src.title());
    dest.set_can_extend(src.n_overflow_bins() == 0);
    if let Axis::Labels(a) = src {
        log::debug!("labeled axis conversion is experimental");
        for (i, label) in a.bin_labels().iter().enumerate() {
            dest.set_bin_label(i + 1, label.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hc_legacy::{TH2F, TH3D};

    fn uniform(n: usize) -> AxisArg {
        AxisArg::Uniform { nbins: n, low: 0.0, high: 1.0 }
    }

    fn variable(edges: &[f64]) -> AxisArg {
        AxisArg::Variable { nbins: edges.len() - 1, edges: edges.to_vec() }
    }

    #[test]
    fn args_from_axes() {
        let a = Axis::growable(4, -1.0, 1.0).unwrap();
        assert_eq!(AxisArg::from_axis(&a), AxisArg::Uniform { nbins: 4, low: -1.0, high: 1.0 });
        let a = Axis::labels(["a", "b", "c"]).unwrap();
        assert_eq!(AxisArg::from_axis(&a), AxisArg::Uniform { nbins: 3, low: 0.0, high: 3.0 });
        let a = Axis::irregular(vec![0.0, 2.0, 3.0]).unwrap();
        assert_eq!(AxisArg::from_axis(&a), variable(&[0.0, 2.0, 3.0]));
    }

    #[test]
    fn mixed_2d_shapes_are_supported() {
        let h = TH2F::construct("h", "", &[variable(&[0.0, 1.0, 3.0]), uniform(5)]).unwrap();
        assert_eq!(h.x_axis().xbins(), &[0.0, 1.0, 3.0]);
        assert_eq!(h.y_axis().nbins(), 5);
    }

    #[test]
    fn mixed_3d_shapes_are_rejected() {
        let err = TH3D::construct("h", "", &[uniform(2), uniform(2), variable(&[0.0, 1.0])]).unwrap_err();
        assert!(matches!(err, Error::InhomogeneousAxes(_)));
        assert!(err.to_string().contains("(nbins, edges)"));

        let e = [0.0, 1.0, 2.0];
        assert!(TH3D::construct("h", "", &[variable(&e), variable(&e), variable(&e)]).is_ok());
        assert!(TH3D::construct("h", "", &[uniform(1), uniform(1), uniform(1)]).is_ok());
    }

    #[test]
    fn backfill_titles_and_extend_flag() {
        let axes = [
            Axis::equidistant(3, 0.0, 3.0).unwrap().with_title("x"),
            Axis::growable(2, 0.0, 1.0).unwrap().with_title("y;z"),
        ];
        let h: TH2F = build(&axes, "h", "t").unwrap();
        assert_eq!(h.x_axis().title(), "x");
        assert!(!h.x_axis().can_extend());
        assert_eq!(h.y_axis().title(), "y;z");
        assert!(h.y_axis().can_extend());
    }

    #[test]
    fn labels_are_backfilled_one_based() {
        let axes = [Axis::labels(["first", "second"]).unwrap()];
        let h: hc_legacy::TH1I = build(&axes, "h", "").unwrap();
        assert_eq!(h.x_axis().bin_label(1), Some("first"));
        assert_eq!(h.x_axis().bin_label(2), Some("second"));
        assert!(h.x_axis().can_extend());
    }
}
