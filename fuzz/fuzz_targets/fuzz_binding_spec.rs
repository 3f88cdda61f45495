#![no_main]

use std::rc::Rc;

use bindery_core::{
    BindingMode, BindingSpecDocument, ConversionError, ConverterRegistry, FnConverter, Value,
};
use libfuzzer_sys::fuzz_target;

fn registry() -> ConverterRegistry {
    let identity = |v: &Value, _: &Value| -> Result<Value, ConversionError> { Ok(v.clone()) };
    let mut converters = ConverterRegistry::new();
    converters.register("Identity", Rc::new(FnConverter::new(identity, identity)));
    converters
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Mode names must parse or fail, never panic.
    let _ = input.parse::<BindingMode>();

    let converters = registry();
    for parsed in [
        BindingSpecDocument::from_json_str(input),
        BindingSpecDocument::from_toml_str(input),
    ] {
        let Ok(document) = parsed else { continue };
        let count = document.bindings.len();
        if let Ok(descriptions) = document.into_descriptions(&converters) {
            assert_eq!(descriptions.len(), count);
            for description in &descriptions {
                assert!(description.validate().is_ok());
                assert!(!description.fallback_value().is_null());
            }
        }
    }
});
