//! **(internal)** End-to-end proof scenarios exercising the whole pipeline, from
//! problem text through cleanup and the waterfall to closure.

mod _test_end_to_end;
mod _test_moves_composed;
mod _test_util;
