use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-colors disabled:pointer-events-none disabled:opacity-50 outline-none focus-visible:ring-2 focus-visible:ring-ring/50 hover:cursor-pointer select-none",
        variants: {
            variant: {
                Primary: "bg-primary text-primary-foreground hover:bg-primary/90",
                Cancel: "border bg-transparent hover:bg-accent hover:text-accent-foreground",
                Danger: "bg-destructive text-white hover:bg-destructive/90 focus-visible:ring-destructive/30",
            },
            size: {
                Default: "h-9 px-4 py-2",
                Sm: "h-7 px-3 text-xs",
            }
        },
        component: {
            element: button
        }
    }
}
