/**
 * ng-cute devkit - inline-assets
 *
 * Rewrites templateUrl/styleUrls component metadata into require() calls
 */
use std::process;

use ng_cute_devkit::main_entry::main_with_args;

fn main() {
    process::exit(main_with_args(std::env::args_os()));
}
