//! The seed corpus: eight product, policy, and support documents indexed at
//! provisioning time. Immutable after indexing.

use serde::{Deserialize, Serialize};

use crate::retriever::Category;

/// A document as authored, before embedding and indexing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Document category.
    pub category: Category,
    /// Full document content; this is what gets embedded.
    pub content: String,
    /// Date the document was last updated.
    pub last_updated: String,
}

fn doc(
    id: &str,
    title: &str,
    category: Category,
    last_updated: &str,
    content: &str,
) -> SeedDocument {
    SeedDocument {
        id: id.to_string(),
        title: title.to_string(),
        category,
        content: content.to_string(),
        last_updated: last_updated.to_string(),
    }
}

/// The eight seed documents for the product index.
pub fn seed_documents() -> Vec<SeedDocument> {
    vec![
        doc(
            "policy-returns-001",
            "Return Policy - Electronics",
            Category::Policy,
            "2025-01-15",
            "Wall-E Electronics Return Policy\n\n\
             All electronics purchases can be returned within 30 days of purchase for a full refund.\n\
             The item must be in its original packaging and in unused condition.\n\n\
             For headphones and audio equipment:\n\
             - 30-day return window for unopened items\n\
             - 14-day return window for opened items (restocking fee of 15% applies)\n\
             - Items must include all original accessories and documentation\n\n\
             For laptops and computers:\n\
             - 30-day return window\n\
             - Must be factory reset before return\n\
             - All original accessories must be included\n\n\
             To initiate a return:\n\
             1. Log into your Wall-E account\n\
             2. Go to Order History\n\
             3. Select the item and click \"Return\"\n\
             4. Print the prepaid shipping label\n\
             5. Drop off at any authorized carrier location\n\n\
             Refunds are processed within 5-7 business days after we receive the item.",
        ),
        doc(
            "product-smartwatch-x200",
            "SmartWatch X200 User Guide",
            Category::Product,
            "2025-02-01",
            "SmartWatch X200 User Guide\n\n\
             Getting Started:\n\
             1. Charge the watch fully before first use (approximately 2 hours)\n\
             2. Press and hold the side button for 3 seconds to power on\n\
             3. Download the Wall-E Wear app from your phone's app store\n\
             4. Follow the pairing instructions in the app\n\n\
             How to Reset Your SmartWatch X200:\n\
             Method 1 - Soft Reset:\n\
             - Press and hold the side button for 10 seconds until the logo appears\n\
             - Release the button and wait for restart\n\n\
             Method 2 - Factory Reset:\n\
             - Go to Settings > System > Reset\n\
             - Select \"Factory Reset\"\n\
             - Confirm by entering your PIN\n\
             - The watch will restart with default settings\n\n\
             Troubleshooting:\n\
             - If the watch won't turn on, charge for at least 30 minutes\n\
             - If Bluetooth won't connect, restart both the watch and phone\n\
             - If the heart rate sensor is inaccurate, clean the sensor and tighten the band\n\n\
             Specifications:\n\
             - Battery life: Up to 7 days\n\
             - Water resistance: 5ATM\n\
             - Display: 1.4\" AMOLED\n\
             - Sensors: Heart rate, SpO2, accelerometer, gyroscope",
        ),
        doc(
            "policy-warranty-001",
            "Warranty Policy",
            Category::Policy,
            "2025-01-20",
            "Wall-E Electronics Warranty Policy\n\n\
             Standard Warranty Coverage:\n\
             - Laptops and Computers: 2 years from date of purchase\n\
             - Smartphones and Tablets: 1 year from date of purchase\n\
             - Headphones and Audio: 1 year from date of purchase\n\
             - Smartwatches and Wearables: 1 year from date of purchase\n\
             - Accessories: 90 days from date of purchase\n\n\
             What's Covered:\n\
             - Manufacturing defects\n\
             - Hardware malfunctions under normal use\n\
             - Battery defects (capacity drops below 80% within warranty period)\n\
             - Display defects (dead pixels, burn-in)\n\n\
             What's NOT Covered:\n\
             - Physical damage (drops, cracks, water damage beyond rated resistance)\n\
             - Software issues or user modifications\n\
             - Normal wear and tear\n\
             - Damage from unauthorized repairs\n\
             - Lost or stolen items\n\n\
             Extended Warranty:\n\
             Wall-E Care+ extends your warranty to 3 years and includes:\n\
             - Accidental damage protection (2 incidents)\n\
             - Priority support\n\
             - Free battery replacement\n\
             - 20% discount on accessories\n\n\
             To file a warranty claim:\n\
             1. Contact Wall-E Support at support@wall-e.com\n\
             2. Provide your order number and product serial number\n\
             3. Describe the issue in detail\n\
             4. Our team will guide you through next steps",
        ),
        doc(
            "product-laptop-pro15",
            "Wall-E Laptop Pro 15 Specifications",
            Category::Product,
            "2025-01-10",
            "Wall-E Laptop Pro 15 - Complete Specifications\n\n\
             Display:\n\
             - 15.6\" 4K OLED display (3840 x 2160)\n\
             - 100% DCI-P3 color gamut\n\
             - 500 nits peak brightness\n\
             - Anti-glare coating\n\n\
             Processor Options:\n\
             - Intel Core i7-13700H (base configuration)\n\
             - Intel Core i9-13900H (performance configuration)\n\n\
             Memory & Storage:\n\
             - RAM: 16GB / 32GB / 64GB DDR5\n\
             - Storage: 512GB / 1TB / 2TB NVMe SSD\n\n\
             Graphics:\n\
             - NVIDIA GeForce RTX 4060 (base)\n\
             - NVIDIA GeForce RTX 4070 (optional upgrade)\n\n\
             Battery:\n\
             - 86 Wh battery\n\
             - Up to 12 hours video playback\n\
             - 140W USB-C fast charging (0-50% in 30 minutes)\n\n\
             Connectivity:\n\
             - Wi-Fi 6E\n\
             - Bluetooth 5.3\n\
             - 2x Thunderbolt 4 ports\n\
             - 1x USB-A 3.2 port\n\
             - HDMI 2.1\n\
             - SD card reader\n\n\
             Dimensions & Weight:\n\
             - 355 x 235 x 16.9 mm\n\
             - 1.8 kg\n\n\
             Included in Box:\n\
             - Laptop Pro 15\n\
             - 140W USB-C Power Adapter\n\
             - USB-C cable\n\
             - Quick Start Guide\n\
             - Warranty card",
        ),
        doc(
            "support-troubleshooting-001",
            "Common Troubleshooting Steps",
            Category::Support,
            "2025-02-03",
            "Wall-E Electronics - Common Troubleshooting Guide\n\n\
             Laptop Issues:\n\n\
             \"My laptop won't turn on\"\n\
             1. Connect the charger and wait 10 minutes\n\
             2. Press and hold power button for 15 seconds\n\
             3. Release and press power button normally\n\
             4. If no response, try a different outlet/charger\n\n\
             \"Laptop is running slow\"\n\
             1. Restart the laptop\n\
             2. Check for Windows updates\n\
             3. Close unnecessary background applications\n\
             4. Run disk cleanup utility\n\
             5. Consider upgrading RAM or switching to SSD\n\n\
             \"Battery draining quickly\"\n\
             1. Reduce screen brightness\n\
             2. Disable Wi-Fi/Bluetooth when not in use\n\
             3. Check battery health in Settings > System > Power\n\
             4. Contact support if health is below 80%\n\n\
             Headphones Issues:\n\n\
             \"Bluetooth won't connect\"\n\
             1. Turn off headphones, wait 10 seconds, turn on\n\
             2. Remove device from Bluetooth settings and re-pair\n\
             3. Reset headphones by holding power button 20 seconds\n\
             4. Update firmware via Wall-E Audio app\n\n\
             \"Audio quality is poor\"\n\
             1. Ensure headphones are fully charged\n\
             2. Move closer to the connected device\n\
             3. Check audio codec settings (use AAC or LDAC)\n\
             4. Clean ear tips and drivers gently\n\n\
             Smartwatch Issues:\n\n\
             \"Watch face is frozen\"\n\
             1. Force restart: hold side button 15 seconds\n\
             2. If persistent, perform factory reset\n\
             3. Contact support if issue continues",
        ),
        doc(
            "product-headphones-nc500",
            "NC500 Noise-Cancelling Headphones",
            Category::Product,
            "2025-01-25",
            "Wall-E NC500 Noise-Cancelling Headphones\n\n\
             Overview:\n\
             The NC500 features industry-leading active noise cancellation with\n\
             40-hour battery life and premium sound quality.\n\n\
             Key Features:\n\
             - Adaptive Active Noise Cancellation (ANC)\n\
             - Transparency mode for ambient awareness\n\
             - 40mm custom drivers with Hi-Res Audio support\n\
             - Bluetooth 5.2 with multipoint connection (2 devices)\n\
             - USB-C fast charging (10 min = 3 hours playback)\n\n\
             Controls:\n\
             - Left earcup: ANC/Transparency toggle\n\
             - Right earcup: Play/pause, volume, track skip\n\
             - Touch and hold right earcup: Voice assistant\n\n\
             Battery Life:\n\
             - With ANC: 30 hours\n\
             - Without ANC: 40 hours\n\
             - Full charge time: 2 hours\n\n\
             Audio Codecs Supported:\n\
             - SBC, AAC, aptX, aptX HD, LDAC\n\n\
             Comfort:\n\
             - Memory foam ear cushions\n\
             - Lightweight design (250g)\n\
             - Foldable for travel\n\n\
             What's in the Box:\n\
             - NC500 Headphones\n\
             - Carrying case\n\
             - USB-C charging cable\n\
             - 3.5mm audio cable\n\
             - Airplane adapter\n\
             - Quick start guide\n\n\
             Price: $299.99\n\
             Colors: Midnight Black, Pearl White, Navy Blue",
        ),
        doc(
            "policy-shipping-001",
            "Shipping and Delivery Policy",
            Category::Policy,
            "2025-01-05",
            "Wall-E Electronics Shipping Policy\n\n\
             Shipping Options (Continental US):\n\n\
             Standard Shipping:\n\
             - 5-7 business days\n\
             - Free on orders over $50\n\
             - $5.99 for orders under $50\n\n\
             Express Shipping:\n\
             - 2-3 business days\n\
             - $12.99 flat rate\n\n\
             Next-Day Shipping:\n\
             - Order by 2 PM for next business day delivery\n\
             - $24.99 flat rate\n\
             - Not available for all items\n\n\
             International Shipping:\n\
             - Available to 50+ countries\n\
             - 7-14 business days\n\
             - Rates calculated at checkout\n\
             - Customer responsible for duties/taxes\n\n\
             Order Tracking:\n\
             - Tracking number emailed within 24 hours of shipment\n\
             - Track at wall-e.com/track or carrier website\n\n\
             Delivery Notes:\n\
             - Signature required for orders over $500\n\
             - Apartment/unit number required for accurate delivery\n\
             - PO Boxes: Standard shipping only\n\n\
             Missing or Damaged Shipments:\n\
             - Report within 48 hours of delivery\n\
             - Photo evidence required for damage claims\n\
             - Replacement or refund processed within 3 business days\n\n\
             Holiday Shipping Deadlines:\n\
             - Check wall-e.com/holidays for seasonal cutoff dates\n\
             - Express shipping recommended during peak periods",
        ),
        doc(
            "support-contact-001",
            "Contact Support",
            Category::Support,
            "2025-02-01",
            "Wall-E Electronics - Contact Support\n\n\
             Customer Service Hours:\n\
             - Monday - Friday: 8 AM - 10 PM EST\n\
             - Saturday - Sunday: 9 AM - 6 PM EST\n\
             - Holiday hours may vary\n\n\
             Contact Methods:\n\n\
             Phone Support:\n\
             - US: 1-800-WALL-E (1-800-266-8676)\n\
             - International: +1-425-555-0100\n\
             - Average wait time: 5 minutes\n\n\
             Live Chat:\n\
             - Available at wall-e.com/support\n\
             - Click the chat icon in the bottom right\n\
             - AI assistant available 24/7\n\
             - Human agents during business hours\n\n\
             Email Support:\n\
             - support@wall-e.com\n\
             - Response within 24 hours\n\n\
             Social Media:\n\
             - Twitter/X: @wall-eSupport\n\
             - Facebook: facebook.com/walleelectronics\n\
             - Instagram: @wall-e_electronics\n\n\
             Self-Service Options:\n\
             - FAQ: wall-e.com/faq\n\
             - Community Forums: community.wall-e.com\n\
             - Video Tutorials: youtube.com/walleelectronics\n\
             - User Manuals: wall-e.com/manuals\n\n\
             Warranty Claims:\n\
             - warranty@wall-e.com\n\
             - Include order number and serial number\n\n\
             Business & Enterprise Support:\n\
             - enterprise@wall-e.com\n\
             - Dedicated account managers available",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_documents_with_unique_ids() {
        let documents = seed_documents();
        assert_eq!(documents.len(), 8);

        let mut ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn warranty_document_states_two_year_laptop_coverage() {
        let documents = seed_documents();
        let warranty = documents.iter().find(|d| d.title == "Warranty Policy").unwrap();
        assert_eq!(warranty.category, Category::Policy);
        assert!(warranty.content.contains("Laptops and Computers: 2 years"));
    }

    #[test]
    fn return_policy_covers_headphones() {
        let documents = seed_documents();
        let returns =
            documents.iter().find(|d| d.title == "Return Policy - Electronics").unwrap();
        assert!(returns.content.contains("headphones and audio equipment"));
    }
}
