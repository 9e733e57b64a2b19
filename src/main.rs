fn main() {
    trace_code_lib::run()
}
