//! Every legacy class constructs with both uniform and variable binning.

use hc_legacy::*;

macro_rules! check_1d {
    ($($t:ty => $name:literal),*) => {$(
        let h = <$t>::new(&unique_name("h1_"), "t;x", 4, -1.0, 1.0).unwrap();
        assert_eq!(h.class_name(), $name);
        assert_eq!(h.ncells(), 6);
        assert_eq!(h.x_axis().title(), "x");
        let h = <$t>::with_edges("v", "", 3, &[0.0, 0.5, 2.0, 3.0]).unwrap();
        assert!(h.x_axis().is_variable_bin_size());
    )*};
}

macro_rules! check_2d {
    ($($t:ty => $name:literal),*) => {$(
        let h = <$t>::new("h", "", 4, -1.0, 1.0, 2, 0.0, 1.0).unwrap();
        assert_eq!(h.class_name(), $name);
        assert_eq!(h.ncells(), 6 * 4);
        let h = <$t>::with_x_edges("h", "", 1, &[0.0, 1.0], 2, 0.0, 1.0).unwrap();
        assert!(h.x_axis().is_variable_bin_size() && !h.y_axis().is_variable_bin_size());
        let h = <$t>::with_y_edges("h", "", 2, 0.0, 1.0, 1, &[0.0, 1.0]).unwrap();
        assert!(!h.x_axis().is_variable_bin_size() && h.y_axis().is_variable_bin_size());
        let h = <$t>::with_edges("h", "", 1, &[0.0, 1.0], 1, &[2.0, 3.0]).unwrap();
        assert_eq!(h.y_axis().xmin(), 2.0);
    )*};
}

macro_rules! check_3d {
    ($($t:ty => $name:literal),*) => {$(
        let h = <$t>::new("h", "", 1, 0.0, 1.0, 2, 0.0, 1.0, 3, 0.0, 1.0).unwrap();
        assert_eq!(h.class_name(), $name);
        assert_eq!(h.ncells(), 3 * 4 * 5);
        assert!(h.axis(2).is_ok());
        assert!(h.axis(3).is_err());
        let e = [0.0, 1.0, 2.0, 4.0];
        let h = <$t>::with_edges("h", "", 3, &e, 3, &e, 3, &e).unwrap();
        assert_eq!(h.z_axis().bin_width(3), 2.0);
    )*};
}

#[test]
fn one_dimensional_classes() {
    check_1d!(TH1C => "TH1C", TH1S => "TH1S", TH1I => "TH1I", TH1F => "TH1F", TH1D => "TH1D");
}

#[test]
fn two_dimensional_classes() {
    check_2d!(TH2C => "TH2C", TH2S => "TH2S", TH2I => "TH2I", TH2F => "TH2F", TH2D => "TH2D");
}

#[test]
fn three_dimensional_classes() {
    check_3d!(TH3C => "TH3C", TH3S => "TH3S", TH3I => "TH3I", TH3F => "TH3F", TH3D => "TH3D");
}

#[test]
fn short_storage_saturates_at_declared_max() {
    let mut h = TH1S::new("s", "", 1, 0.0, 1.0).unwrap();
    h.add_bin_content(1, 40000.0).unwrap();
    assert_eq!(h.bin_content(1), 32767.0);
    h.add_bin_content(1, -70000.0).unwrap();
    assert_eq!(h.bin_content(1), -32767.0);
}
