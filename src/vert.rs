// Manatee vertical format
//
// One token per line with tab separated attributes, structures as tags on
// their own lines:
//
//   text  w-id  a-id  b-id  lemma  tags
//
// Errors are marked by <err>/<corr> pairs. Level 1 is an edit between the
// W and A layers, level 2 between the A and B layers (possibly nested in a
// level 1 correction).

pub mod record;
pub mod renderer;
