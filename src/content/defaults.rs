//! Factory content shipped with the build. `reset_all` and every failed
//! load fall back to these values.

use super::image::ImageRef;
use super::snapshot::Snapshot;
use super::types::*;

const IMG_BASE: &str = "https://images.unsplash.com";

fn img(path: &str) -> ImageRef {
    ImageRef::new(format!("{IMG_BASE}/{path}?auto=format&fit=crop&w=1600&q=80"))
}

/// The compiled default snapshot. Item ids are fixed so that two calls
/// produce identical values.
pub fn snapshot() -> Snapshot {
    let mut snapshot = Snapshot {
        header: header(),
        hero: hero(),
        highlights: highlights(),
        features: features(),
        vibe: vibe(),
        testimonials: testimonials(),
        battery: battery(),
        footer: footer(),
        food_menu: food_menu(),
        drinks_menu: drinks_menu(),
        gallery: gallery(),
    };
    stamp_ids(&mut snapshot);
    snapshot
}

fn stamp_ids(snapshot: &mut Snapshot) {
    let mut seq = 0u128;
    let mut next = || {
        seq += 1;
        ItemId::fixed(seq)
    };
    let menus = snapshot
        .food_menu
        .iter_mut()
        .chain(snapshot.drinks_menu.cocktails.iter_mut());
    for category in menus {
        for item in &mut category.items {
            item.id = next();
        }
    }
    for image in &mut snapshot.gallery.images {
        image.id = next();
    }
}

fn header() -> HeaderContent {
    HeaderContent {
        logo_url: ImageRef::new("/images/lkc-logo.png"),
    }
}

fn hero() -> HeroContent {
    HeroContent {
        badge_text: "Open daily 2pm - 3am".into(),
        heading_text: "London Karaoke Club".into(),
        sub_text: "Private karaoke spaces in the heart of Soho for groups of 10 to 50+. \
                   No boxes, just epic sound."
            .into(),
        button_text: "Book Your Room".into(),
        background_image_url: img("photo-1516450360452-9312f5e86fc7"),
    }
}

fn highlights() -> HighlightsContent {
    HighlightsContent {
        heading: "Get the party started".into(),
        subtext: "Your own private space with a private entrance, studio-quality sound \
                  and a song list that never ends."
            .into(),
        main_image_url: img("photo-1470225620780-dba8ba36b745"),
        side_image_url: img("photo-1493225457124-a3eb161ffa5f"),
        feature_list_title: "Every booking includes".into(),
        feature_list: vec![
            "60,000+ songs, 400+ new every month".into(),
            "Remote song queue from your smartphone".into(),
            "Custom key, tempo and vocal levels".into(),
            "Dedicated host for your group".into(),
        ],
    }
}

fn features() -> FeaturesContent {
    FeaturesContent {
        experience: ExperienceBlock {
            label: "The Experience".into(),
            heading: "Not a franchise. Not a box.".into(),
            text: "Velvet drapes, fairy lights and open layouts. \
                   Sing like the whole club is yours, because it is."
                .into(),
            image: img("photo-1514525253161-7a46d19cd819"),
        },
        occasions: OccasionsBlock {
            heading: "Made for every occasion".into(),
            text: "From hen dos to wrap parties, we host it all until 3am.".into(),
            items: vec![
                OccasionCard {
                    title: "Hen & Stag Dos".into(),
                    text: "Sequins, costumes and a stage that can take it.".into(),
                },
                OccasionCard {
                    title: "Birthdays".into(),
                    text: "Blow out the candles, then blow the roof off.".into(),
                },
                OccasionCard {
                    title: "Corporate Events".into(),
                    text: "Team building with a microphone in every hand.".into(),
                },
            ],
        },
        grid: GridBlock {
            heading: "Why groups choose us".into(),
            items: vec![
                GridCard {
                    title: "Studio-quality sound".into(),
                    description: "Crystal-clear audio that outshines most London venues.".into(),
                    image: img("photo-1598488035139-bdbb2231ce04"),
                },
                GridCard {
                    title: "Private entrances".into(),
                    description: "Your group, your door, your night.".into(),
                    image: img("photo-1566737236500-c8ac43014a67"),
                },
            ],
        },
    }
}

fn vibe() -> VibeContent {
    VibeContent {
        label: "The Vibe".into(),
        heading: "The heart of the party".into(),
        text: "Lights down, volume up. Every room is tuned for the big chorus.".into(),
        image1: img("photo-1501386761578-eac5c94b800a"),
        image2: img("photo-1492684223066-81342ee5ff30"),
        bottom_heading: "Sing until 3am".into(),
        bottom_text: "We outlast the competition, every single night.".into(),
        big_image: img("photo-1429962714451-bb934ecdc4ec"),
    }
}

fn testimonials() -> TestimonialsContent {
    TestimonialsContent {
        heading: "What our singers say".into(),
        subtext: "Five-star nights, straight from the microphone.".into(),
        items: vec![
            Testimonial {
                name: "Sophie R.".into(),
                quote: "Best hen do ever. The room was ours and the sound was unreal.".into(),
                avatar: ImageRef::new("/images/avatars/sophie.jpg"),
            },
            Testimonial {
                name: "Marcus T.".into(),
                quote: "Booked for our team night and nobody wanted to leave.".into(),
                avatar: ImageRef::new("/images/avatars/marcus.jpg"),
            },
            Testimonial {
                name: "Priya K.".into(),
                quote: "Finally, karaoke without the padded box. We'll be back.".into(),
                avatar: ImageRef::new("/images/avatars/priya.jpg"),
            },
        ],
    }
}

fn battery() -> BatteryContent {
    BatteryContent {
        stat_prefix: "Over".into(),
        stat_number: "60,000".into(),
        stat_suffix: "Songs".into(),
        sub_text: "to choose from, with new tracks added every day".into(),
    }
}

fn footer() -> FooterContent {
    FooterContent {
        cta_heading: "Ready to take the stage?".into(),
        cta_text: "Prebooking is essential. No walk-ins, just your private night in Soho.".into(),
        cta_button_text: "Book Now".into(),
    }
}

fn food_menu() -> Vec<MenuCategory> {
    vec![
        MenuCategory {
            category: "Sharing Platters".into(),
            description: Some("Built for groups, served to your room.".into()),
            items: vec![
                MenuItem::new(
                    "Soho Grazing Board",
                    "Cured meats, cheeses, olives, breads and dips",
                    "45",
                ),
                MenuItem::new("Wings & Things", "Buffalo wings, halloumi fries, onion rings", "38"),
                MenuItem::new("Veggie Feast", "Falafel, hummus, crudites, flatbreads", "35")
                    .with_note("Vegan"),
            ],
        },
        MenuCategory {
            category: "Snacks".into(),
            description: None,
            items: vec![
                MenuItem::new("Loaded Fries", "Cheese sauce, jalapenos, crispy onions", "9"),
                MenuItem::new("Nachos", "Salsa, guacamole, sour cream", "10")
                    .with_note("Vegetarian"),
                MenuItem::new("Popcorn Chicken", "Sriracha mayo", "9"),
            ],
        },
    ]
}

fn drinks_menu() -> DrinksMenu {
    DrinksMenu {
        header_image_url: Some(img("photo-1514362545857-3bc16c4c7d1b")),
        cocktails: vec![
            MenuCategory {
                category: "Signature Cocktails".into(),
                description: None,
                items: vec![
                    MenuItem::new(
                        "Bohemian Rhapsody",
                        "Vodka, passion fruit, vanilla, prosecco",
                        "12",
                    ),
                    MenuItem::new("Purple Rain", "Gin, violet, lemon, butterfly pea", "12"),
                    MenuItem::new("Dancing Queen", "Rum, pineapple, coconut, lime", "12"),
                ],
            },
            MenuCategory {
                category: "Cocktail Jugs".into(),
                description: Some("Serves 4 to 6".into()),
                items: vec![
                    MenuItem::new("Pornstar Jug", "Vanilla vodka, passion fruit, prosecco", "45"),
                    MenuItem::new("Mojito Jug", "White rum, mint, lime, soda", "40"),
                ],
            },
        ],
        bottles: vec![BottleCategory {
            category: "Bubbles".into(),
            items: vec![
                BottleItem {
                    name: "Prosecco".into(),
                    prices: vec![
                        SizedPrice { size: "125ml".into(), price: "8".into() },
                        SizedPrice { size: "Bottle".into(), price: "35".into() },
                    ],
                },
                BottleItem {
                    name: "Champagne".into(),
                    prices: vec![SizedPrice { size: "Bottle".into(), price: "85".into() }],
                },
            ],
        }],
    }
}

fn gallery() -> GalleryContent {
    GalleryContent {
        heading: "Gallery".into(),
        subtext: "A glimpse of the nights we host.".into(),
        images: vec![
            GalleryImage {
                id: ItemId::new(),
                url: img("photo-1516450360452-9312f5e86fc7"),
                caption: Some("Main room".into()),
            },
            GalleryImage {
                id: ItemId::new(),
                url: img("photo-1470225620780-dba8ba36b745"),
                caption: None,
            },
        ],
    }
}
