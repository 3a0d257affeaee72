fn main() {
    lkc_cms_lib::run()
}
