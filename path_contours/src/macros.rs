/// Macro used for test assertions.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_fuzzy_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(left_val.fuzzy_eq(*right_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq(right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        &*left_val, &*right_val
                    )
                }
            }
        }
    }};
    ($left:expr, $right:expr, $eps:expr) => {{
        match (&$left, &$right, &$eps) {
            (left_val, right_val, eps_val) => {
                if !(left_val.fuzzy_eq_eps(*right_val, *eps_val)) {
                    panic!(
                        r#"assertion failed: `left.fuzzy_eq_eps(right, eps)`
  left: `{:?}`,
 right: `{:?}`
 eps: `{:?}`"#,
                        &*left_val, &*right_val, &*eps_val
                    )
                }
            }
        }
    }};
}

/// Counts macro repetitions so polygon macros can reserve capacity up front.
#[doc(hidden)]
#[macro_export]
macro_rules! replace_expr {
    ($_t:tt $sub:expr) => {
        $sub
    };
}

/// Construct an open polygon (polyline) from a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use path_contours::polygon_open;
/// # use path_contours::core::math::Vector2;
/// let polygon = polygon_open![(0.0, 1.0), (2.0, 0.0)];
/// assert!(!polygon.is_closed());
/// assert_eq!(polygon[1], Vector2::new(2.0, 0.0));
/// ```
#[macro_export]
macro_rules! polygon_open {
    ($( $x:expr ),* $(,)?) => {
        {
            let size = <[()]>::len(&[$($crate::replace_expr!(($x) ())),*]);
            let mut pg = $crate::polygon::Polygon::with_capacity(size, false);
            $(
                pg.add($x.0, $x.1);
            )*
            pg
        }
    };
}

/// Construct a closed polygon from a list of (x, y) tuples.
///
/// # Examples
///
/// ```
/// # use path_contours::polygon_closed;
/// let polygon = polygon_closed![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)];
/// assert!(polygon.is_closed());
/// assert_eq!(polygon.vertex_count(), 3);
/// ```
#[macro_export]
macro_rules! polygon_closed {
    ($( $x:expr ),* $(,)?) => {
        {
            let size = <[()]>::len(&[$($crate::replace_expr!(($x) ())),*]);
            let mut pg = $crate::polygon::Polygon::with_capacity(size, true);
            $(
                pg.add($x.0, $x.1);
            )*
            pg
        }
    };
}
